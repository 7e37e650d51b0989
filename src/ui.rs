use console::{strip_ansi_codes, Term};
use owo_colors::OwoColorize;
use unicode_width::UnicodeWidthStr;

use laptophub::display::{rating_display, Price, SaleState, MAX_RATING};

/// Terminal output helpers
pub struct UI {
    term: Term,
}

impl UI {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    /// Helper method to conditionally apply color based on terminal support
    fn colorize<F>(&self, text: &str, color_fn: F) -> String
    where
        F: FnOnce(&str) -> String,
    {
        if self.supports_color() {
            color_fn(text)
        } else {
            text.to_string()
        }
    }

    pub fn success(&self, message: &str) {
        let output = self.colorize(message, |m| m.green().bold().to_string());
        println!("{}", output);
    }

    pub fn error(&self, message: &str) {
        let output = self.colorize(message, |m| m.red().bold().to_string());
        eprintln!("{}", output);
    }

    pub fn warning(&self, message: &str) {
        let output = self.colorize(message, |m| m.yellow().bold().to_string());
        println!("{}", output);
    }

    pub fn info(&self, message: &str) {
        let output = self.colorize(message, |m| m.blue().bold().to_string());
        println!("{}", output);
    }

    pub fn format_auth_status(&self, authenticated: bool) -> String {
        if authenticated {
            self.colorize("Signed in", |t| t.green().to_string())
        } else {
            self.colorize("Not signed in", |t| t.red().to_string())
        }
    }

    pub fn format_verified(&self, verified: bool) -> String {
        if verified {
            self.colorize("Verified", |t| t.green().to_string())
        } else {
            self.colorize("Not verified", |t| t.yellow().to_string())
        }
    }

    /// Value or `-` for missing and blank fields
    pub fn format_field(&self, value: Option<&str>) -> String {
        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or("-")
            .to_string()
    }

    /// Stars for a decimal rating, `No rating` when unreadable
    pub fn format_rating(&self, raw: Option<&str>) -> String {
        match rating_display(raw) {
            Some(rating) => {
                let filled = rating.round() as usize;
                let empty = (MAX_RATING as usize).saturating_sub(filled);
                let stars = format!("{}{}", "★".repeat(filled), "☆".repeat(empty));
                format!("{} {:.1}", self.colorize(&stars, |s| s.yellow().to_string()), rating)
            }
            None => "No rating".to_string(),
        }
    }

    pub fn format_price(&self, raw: Option<&str>) -> String {
        match Price::from_wire(raw) {
            Price::OnRequest => self.colorize("Price on request", |t| t.dimmed().to_string()),
            price => self.colorize(&price.to_string(), |t| t.green().bold().to_string()),
        }
    }

    pub fn format_sale_state(&self, status: Option<&str>) -> String {
        let state = SaleState::classify(status);
        let label = state.label().to_string();
        match state {
            SaleState::New => self.colorize(&label, |t| t.green().to_string()),
            SaleState::Sold => self.colorize(&label, |t| t.red().to_string()),
            SaleState::Other(_) => self.colorize(&label, |t| t.yellow().to_string()),
            SaleState::Unknown => self.colorize(&label, |t| t.dimmed().to_string()),
        }
    }

    pub fn blank_line(&self) {
        println!();
    }

    pub fn header(&self, title: &str) {
        let term_width = self.width();
        let title_len = title.width() + 4;
        let line_len = if term_width > title_len {
            (term_width - title_len) / 2
        } else {
            0
        };

        let line = "═".repeat(line_len.min(38));

        println!();
        if self.supports_color() {
            println!("{} {} {}", line.cyan(), title.cyan().bold(), line.cyan());
        } else {
            println!("{} {} {}", line, title, line);
        }
        println!();
    }

    /// Create a card-style display for information
    pub fn card(&self, title: &str, content: Vec<(&str, String)>) {
        let term_width = self.width();
        let card_width = term_width.saturating_sub(4).clamp(50, 80);

        let supports_color = self.supports_color();

        println!("╭{}╮", "─".repeat(card_width - 2));
        let title_width = title.width();
        let title_spaces = card_width.saturating_sub(title_width + 4);
        if supports_color {
            println!("│ {} {}│", title.cyan().bold(), " ".repeat(title_spaces));
        } else {
            println!("│ {} {}│", title, " ".repeat(title_spaces));
        }
        println!("├{}┤", "─".repeat(card_width - 2));

        for (label, value) in content {
            // Width is measured without ANSI codes
            let label_plain = strip_ansi_codes(label);
            let value_plain = strip_ansi_codes(&value);

            let content_width = label_plain.width() + value_plain.width() + 4;

            let spaces = if content_width < card_width - 1 {
                card_width - content_width - 1
            } else {
                1
            };

            if supports_color {
                println!("│ {}: {}{}│", label.dimmed(), value, " ".repeat(spaces));
            } else {
                println!("│ {}: {}{}│", label, value, " ".repeat(spaces));
            }
        }

        println!("╰{}╯", "─".repeat(card_width - 2));
        println!();
    }

    /// Numbered row for list output
    pub fn list_item(&self, index: usize, title: &str, details: &str) {
        if self.supports_color() {
            println!("{:>3}. {}", index.dimmed(), title.bold());
        } else {
            println!("{:>3}. {}", index, title);
        }
        if !details.is_empty() {
            println!("     {}", details);
        }
    }

    /// `Page 2 of 5 (58 total)`
    pub fn page_footer(&self, page: u32, pages: u64, total: u64) {
        let footer = format!("Page {} of {} ({} total)", page.max(1), pages, total);
        println!();
        println!("{}", self.colorize(&footer, |t| t.dimmed().to_string()));
    }

    /// Get terminal width for responsive layout
    pub fn width(&self) -> usize {
        self.term.size().1 as usize
    }

    pub fn supports_color(&self) -> bool {
        self.term.features().colors_supported()
    }
}

impl Default for UI {
    fn default() -> Self {
        Self::new()
    }
}
