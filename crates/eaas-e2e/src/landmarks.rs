//! Well-known UI landmarks of the EaaS frontend.
//!
//! Each function returns the ordered strategies for one landmark. Semantic
//! attributes come first; styling classes and structural fallbacks last.
//! Collection selectors (rows, cards) are plain CSS lists used with
//! `count()`.

use crate::locate::{Locate, TextPattern};

/// Bill rows/cards on `/billing`.
pub const BILL_ITEMS: &str = "[data-testid^='bill-'], .bill-card, .bill-item, .bill-row, table.bills tbody tr";

/// Ticket rows/cards on `/support`.
pub const TICKET_ITEMS: &str = "[data-testid^='ticket-'], .ticket-card, .ticket-item, .ticket-row";

/// Plan cards on `/services-plans`.
pub const PLAN_CARDS: &str = "[data-testid^='plan-'], .plan-card, [class*='plan-card']";

/// Metric cards on `/dashboard`.
pub const METRIC_CARDS: &str = "[data-testid^='metric-'], .metric-card, .stat-card, [class*='metric']";

/// Entries in an open notification list.
pub const NOTIFICATION_ITEMS: &str = "[data-testid^='notification-'], .notification-item, [role='listitem'][class*='notification']";

/// Messages in the AI advisor transcript.
pub const CHAT_MESSAGES: &str = "[data-role], .message, [class*='message']";

/// Advisor-authored messages in the AI advisor transcript.
pub const ASSISTANT_MESSAGES: &str = "[data-role='assistant'], .assistant, [class*='assistant']";

pub fn email_input() -> Locate {
    Locate::new("email input")
        .css("input[type='email']")
        .css("input[name='email']")
        .css("input[placeholder*='email' i]")
}

pub fn password_input() -> Locate {
    Locate::new("password input")
        .css("input[name='password']")
        .css("input[type='password']")
}

pub fn submit_button() -> Locate {
    Locate::new("submit button")
        .css("form button[type='submit']")
        .text(
            "button",
            TextPattern::phrase(&[
                "login", "log in", "sign in", "register", "sign up", "create account", "submit",
                "save", "create", "create ticket",
            ]),
        )
}

/// Error banner, toast or inline message.
pub fn error_message() -> Locate {
    Locate::new("error message")
        .css("[role='alert']")
        .css(".error, .error-message, .alert-error, .text-red-500, .text-red-600, .bg-red-50")
        .text(
            "p, span, div",
            TextPattern::words(&[
                "invalid",
                "incorrect",
                "failed",
                "wrong",
                "already exists",
                "already registered",
                "already in use",
                "required",
                "error",
            ]),
        )
}

/// Success banner or toast.
pub fn success_message() -> Locate {
    Locate::new("success message")
        .css("[role='status']")
        .css(".success, .success-message, .alert-success, .text-green-600, .bg-green-50")
        .text(
            "p, span, div",
            TextPattern::words(&["success", "successfully", "updated", "saved", "created"]),
        )
}

pub fn logout_control() -> Locate {
    Locate::new("logout control")
        .css("[aria-label*='logout' i], [aria-label*='log out' i], [data-testid='logout']")
        .text(
            "button, a, [role='menuitem']",
            TextPattern::phrase(&["logout", "log out", "sign out"]),
        )
}

/// Menu that may hide the logout control (avatar, account menu).
pub fn user_menu() -> Locate {
    Locate::new("user menu")
        .css("[aria-label*='user menu' i], [aria-label*='account' i], [aria-label*='profile menu' i]")
        .css("[data-testid='user-menu'], .user-menu, .avatar")
}

pub fn notification_bell() -> Locate {
    Locate::new("notification bell")
        .css("[aria-label*='notification' i]")
        .css("[data-testid*='notification' i]")
        .css("button:has(svg[class*='bell' i]), [class*='bell' i]")
        .icon_only("header button", 2)
}

pub fn unread_badge() -> Locate {
    Locate::new("unread badge")
        .css("[data-testid='unread-count']")
        .css("[aria-label*='notification' i] [class*='badge' i], .notification-badge")
}

pub fn mark_all_read() -> Locate {
    Locate::new("mark all read")
        .css("[data-testid='mark-all-read']")
        .text(
            "button, a",
            TextPattern::phrase(&["mark all as read", "mark all read", "clear all"]),
        )
}

pub fn notifications_empty() -> Locate {
    Locate::new("notifications empty state").text(
        "p, div, span, li",
        TextPattern::words(&["no notifications", "no new notifications", "all caught up"]),
    )
}

pub fn bill_item() -> Locate {
    Locate::new("bill item").css(BILL_ITEMS)
}

pub fn no_bills_message() -> Locate {
    Locate::new("no bills message").text(
        "p, div, span, td, h2, h3",
        TextPattern::words(&["no bills found", "no bills", "no invoices"]),
    )
}

pub fn pay_button() -> Locate {
    Locate::new("pay button")
        .css("[data-testid='pay-now']")
        .text("button", TextPattern::phrase(&["pay", "pay now", "pay bill", "make payment"]))
}

pub fn download_invoice_control() -> Locate {
    Locate::new("download invoice control")
        .css("[data-testid='download-invoice'], a[download], a[href*='invoice' i]")
        .text(
            "button, a",
            TextPattern::phrase(&["download", "download invoice", "download pdf", "invoice"]),
        )
}

pub fn ticket_item() -> Locate {
    Locate::new("ticket item").css(TICKET_ITEMS)
}

pub fn no_tickets_message() -> Locate {
    Locate::new("no tickets message").text(
        "p, div, span, h2, h3",
        TextPattern::words(&["no tickets", "no support tickets", "haven't raised"]),
    )
}

pub fn new_ticket_button() -> Locate {
    Locate::new("new ticket button")
        .css("[data-testid='new-ticket'], a[href*='/support/new']")
        .text(
            "button, a",
            TextPattern::phrase(&["new ticket", "create ticket", "raise ticket", "raise a ticket"]),
        )
}

pub fn plan_card() -> Locate {
    Locate::new("plan card").css(PLAN_CARDS)
}

pub fn select_plan_button() -> Locate {
    Locate::new("select plan button")
        .css("[data-testid^='select-plan']")
        .text(
            "button, a",
            TextPattern::phrase(&["select", "select plan", "choose plan", "subscribe", "get started"]),
        )
}

pub fn chat_input() -> Locate {
    Locate::new("chat input")
        .css("textarea[placeholder*='ask' i], input[placeholder*='ask' i]")
        .css("textarea[placeholder*='message' i], input[placeholder*='message' i]")
        .css("textarea")
}

/// The send button next to the chat input; often icon-only.
pub fn chat_send_button() -> Locate {
    Locate::new("chat send button")
        .css("button[aria-label*='send' i]")
        .text("button", TextPattern::phrase(&["send"]))
        .sibling_of("textarea", "button")
        .sibling_of("input[placeholder*='ask' i]", "button")
        .icon_only("form button", 1)
}

pub fn suggestion_chip() -> Locate {
    Locate::new("suggested prompt")
        .css("[data-testid='suggestion'], .suggestion, .prompt-chip")
}

pub fn typing_indicator() -> Locate {
    Locate::new("typing indicator")
        .css("[data-testid='typing-indicator'], .typing-indicator, [class*='typing']")
}

pub fn mobile_menu_toggle() -> Locate {
    Locate::new("mobile menu toggle")
        .css("[aria-label*='menu' i]:not([aria-label*='user' i])")
        .css("button[class*='hamburger' i], button[class*='menu-toggle' i]")
}
