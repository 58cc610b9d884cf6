use chrono::{Local, TimeZone};

use flashdeck_lib::flashcards::algorithm::{format_interval, preview_intervals, IntervalTable};
use flashdeck_lib::flashcards::{Card, CardType, LearningStats, SessionStats};

/// ANSI color codes
#[allow(dead_code)]
pub struct Color;

#[allow(dead_code)]
impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const MAGENTA: &str = "\x1b[35m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

fn type_label(card_type: CardType) -> &'static str {
    match card_type {
        CardType::Word => "word",
        CardType::Phrase => "phrase",
    }
}

/// Filled/empty pips for a level, e.g. `●●●○○○`
pub fn level_pips(level: u32, intervals: &IntervalTable) -> String {
    let filled = level.min(intervals.max_level()) as usize + 1;
    let empty = intervals.len().saturating_sub(filled);
    format!("{}{}", "●".repeat(filled), "○".repeat(empty))
}

/// Card face: the front, plus the back when revealed
pub fn render_card(card: &Card, revealed: bool, intervals: &IntervalTable, use_color: bool) -> String {
    let mut lines = Vec::new();

    let mut front = paint(&card.front, Color::BOLD, use_color);
    if let Some(pos) = &card.pos {
        front.push(' ');
        front.push_str(&paint(pos, Color::GRAY, use_color));
    }
    lines.push(format!(
        "{}  {}",
        front,
        paint(
            &format!("[{} {}]", type_label(card.card_type), level_pips(card.level, intervals)),
            Color::DIM,
            use_color
        )
    ));

    if revealed {
        lines.push(format!("  {}", paint(&card.back, Color::CYAN, use_color)));
    }

    lines.join("\n")
}

/// Hint showing where each answer sends the card, e.g. `y: 1d  n: now`
pub fn render_answer_hint(card: &Card, intervals: &IntervalTable, use_color: bool) -> String {
    let (pass, fail) = preview_intervals(card, intervals);
    format!(
        "{}  {}",
        paint(&format!("y: {}", format_interval(pass)), Color::GREEN, use_color),
        paint(&format!("n: {}", format_interval(fail)), Color::RED, use_color)
    )
}

/// Human-readable due time relative to `now`
pub fn format_due(next_review: i64, now: i64) -> String {
    if next_review <= now {
        return "due now".to_string();
    }
    match Local.timestamp_millis_opt(next_review).single() {
        Some(at) => at.format("%Y-%m-%d %H:%M").to_string(),
        None => "later".to_string(),
    }
}

pub fn render_learning_stats(stats: &LearningStats, use_color: bool) -> String {
    const WIDTH: usize = 30;
    let filled = ((stats.mastered_percent() / 100.0) * WIDTH as f64).round() as usize;
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(WIDTH - filled.min(WIDTH)));

    format!(
        "Due: {}  Mastered: {}  Learning: {}  Total: {}\n{} {:.0}%",
        paint(&stats.due.to_string(), Color::BLUE, use_color),
        paint(&stats.mastered.to_string(), Color::GREEN, use_color),
        stats.learning,
        paint(&stats.total.to_string(), Color::MAGENTA, use_color),
        paint(&bar, Color::GREEN, use_color),
        stats.mastered_percent()
    )
}

pub fn render_session_stats(stats: &SessionStats, use_color: bool) -> String {
    format!(
        "{} correct, {} incorrect",
        paint(&stats.correct.to_string(), Color::GREEN, use_color),
        paint(&stats.incorrect.to_string(), Color::RED, use_color)
    )
}
