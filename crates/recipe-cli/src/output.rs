use recipe_core::card::Card;
use recipe_core::walkthrough::{Progress, WalkthroughSnapshot};
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Single-line JSON, for streams of events.
pub fn print_json_line<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string(value)?;
    println!("{}", json);
    Ok(())
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let header_row: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
        .collect();
    println!("{}", header_row.join("  ").trim_end());

    let sep: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", sep.join("  "));

    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let w = widths.get(i).copied().unwrap_or(0);
                format!("{:width$}", cell, width = w)
            })
            .collect();
        println!("{}", cells.join("  ").trim_end());
    }
}

/// `"Ingredient 2: Flour (4 cups)"`, notes on a second indented line.
pub fn card_line(card: &Card) -> String {
    let mut line = format!("{}: {}", card.label, card.title);
    if let Some(detail) = &card.detail {
        line.push_str(&format!(" ({detail})"));
    }
    if let Some(notes) = &card.notes {
        line.push_str(&format!("\n    {notes}"));
    }
    line
}

/// Ten-cell text bar, e.g. `[####------] 2/5`.
pub fn progress_bar(progress: &Progress) -> String {
    const WIDTH: usize = 10;
    let filled = (progress.fraction() * WIDTH as f64).round() as usize;
    format!(
        "[{}{}] {}/{}",
        "#".repeat(filled),
        "-".repeat(WIDTH - filled.min(WIDTH)),
        progress.completed,
        progress.total
    )
}

pub fn print_snapshot(snapshot: &WalkthroughSnapshot) {
    println!(
        "Step {}/{}  {}",
        snapshot.position + 1,
        snapshot.total_steps,
        card_line(&snapshot.card)
    );
    for (category, progress) in &snapshot.progress {
        println!("  {:<12} {}", category.label(), progress_bar(progress));
    }
    if let Some(remaining) = snapshot.timer.display() {
        let state = if snapshot.paused { " (paused)" } else { "" };
        println!("  Timer        {remaining}{state}");
    }
    let nav = match (snapshot.shows_previous, snapshot.shows_next) {
        (true, true) => "prev | next",
        (true, false) => "prev",
        (false, true) => "next",
        (false, false) => "",
    };
    if !nav.is_empty() {
        println!("  [{nav}]");
    }
}
