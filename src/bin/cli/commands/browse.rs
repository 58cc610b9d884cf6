use std::io::{BufRead, Write};

use anyhow::Result;

use flashdeck_lib::flashcards::Direction;
use flashdeck_lib::now_millis;

use crate::app::App;
use crate::render::terminal::{format_due, paint, render_card, Color};

const HELP: &str = "[enter/n] next  [p] previous  [f] flip  [c] filter  [q] quit";

pub fn run<R: BufRead, W: Write>(app: &mut App, input: &mut R, out: &mut W, use_color: bool) -> Result<()> {
    let unit = app.require_active_unit()?;
    let session = &mut app.session;

    writeln!(out, "{} · browse · filter: {}", paint(&unit.name, Color::BOLD, use_color), session.filter())?;
    writeln!(out, "{}", paint(HELP, Color::DIM, use_color))?;

    let mut revealed = false;
    let mut redraw = true;

    loop {
        if redraw {
            writeln!(out)?;
            match session.current_card() {
                Some(card) => {
                    if let Some((rank, total)) = session.position() {
                        writeln!(out, "{}", paint(&format!("{}/{}", rank, total), Color::GRAY, use_color))?;
                    }
                    writeln!(out, "{}", render_card(card, revealed, session.intervals(), use_color))?;
                    if revealed {
                        writeln!(out, "  {}", paint(&format_due(card.next_review, now_millis()), Color::GRAY, use_color))?;
                    }
                }
                None => writeln!(out, "No {} cards in this unit.", session.filter())?,
            }
            redraw = false;
        }

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        match line.trim().to_lowercase().as_str() {
            "q" => break,
            "" | "n" => {
                session.navigate(Direction::Forward);
                revealed = false;
                redraw = true;
            }
            "p" => {
                session.navigate(Direction::Backward);
                revealed = false;
                redraw = true;
            }
            "f" => {
                revealed = !revealed;
                redraw = true;
            }
            "c" => {
                session.cycle_filter(now_millis());
                writeln!(out, "Filter: {}", session.filter())?;
                revealed = false;
                redraw = true;
            }
            _ => writeln!(out, "{}", paint(HELP, Color::DIM, use_color))?,
        }
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashdeck_lib::flashcards::{CardType, StudyMode};
    use flashdeck_lib::Card;
    use tempfile::TempDir;

    fn browse(app: &mut App, script: &str) -> String {
        let mut input = script.as_bytes();
        let mut out = Vec::new();
        run(app, &mut input, &mut out, false).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn three_cards() -> Vec<flashdeck_lib::Card> {
        vec![
            Card::new("a", "harbour", "港口", CardType::Word),
            Card::new("b", "look after", "照顾", CardType::Phrase),
            Card::new("c", "bridge", "桥", CardType::Word),
        ]
    }

    fn current_id(app: &App) -> Option<String> {
        app.session.current_card().map(|c| c.id.clone())
    }

    #[test]
    fn test_previous_wraps_to_last() {
        let dir = TempDir::new().unwrap();
        let mut app = App::for_test(&dir, three_cards(), StudyMode::Browse);

        let output = browse(&mut app, "p\nq\n");

        assert!(output.contains("1/3"));
        assert!(output.contains("3/3"));
        assert_eq!(current_id(&app).as_deref(), Some("c"));
    }

    #[test]
    fn test_next_wraps_to_first() {
        let dir = TempDir::new().unwrap();
        let mut app = App::for_test(&dir, three_cards(), StudyMode::Browse);

        browse(&mut app, "n\n\nn\nq\n");

        assert_eq!(current_id(&app).as_deref(), Some("a"));
    }

    #[test]
    fn test_filter_skips_other_type() {
        let dir = TempDir::new().unwrap();
        let mut app = App::for_test(&dir, three_cards(), StudyMode::Browse);

        // all -> word, then a -> c -> a
        let output = browse(&mut app, "c\nn\nn\nq\n");

        assert!(output.contains("Filter: word"));
        assert!(output.contains("2/2"));
        assert!(!output.contains("look after"));
        assert_eq!(current_id(&app).as_deref(), Some("a"));
    }

    #[test]
    fn test_flip_shows_back_without_scheduling() {
        let dir = TempDir::new().unwrap();
        let mut app = App::for_test(&dir, three_cards(), StudyMode::Browse);

        let output = browse(&mut app, "f\nq\n");

        assert!(output.contains("港口"));
        assert!(output.contains("due now"));
        assert!(app.session.cards().iter().all(|c| c.level == 0 && c.last_reviewed.is_none()));
    }
}
