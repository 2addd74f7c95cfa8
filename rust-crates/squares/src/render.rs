// Plain-text rendering of a board for the terminal.
use squares::{
    Cell,
    Quarter,
    board::GRID_SIZE,
    payout::format_money,
    view::BoardView,
};

const CELL_WIDTH: usize = 8;

fn fit(name: &str) -> String {
    let mut fitted: String = name.chars().take(CELL_WIDTH - 1).collect();
    if fitted.len() < name.len() {
        fitted.pop();
        fitted.push('~');
    }
    fitted
}

fn digit_label(digit: Option<u8>) -> String {
    digit.map_or_else(|| "?".to_string(), |digit| digit.to_string())
}

pub fn board(view: &BoardView) -> String {
    let mut lines = vec![format!(
        "{} (columns) vs {} (rows)",
        view.home_team_name, view.away_team_name
    )];
    let mut header = format!("{:>4}", "");
    for col in 0..GRID_SIZE as usize {
        let digit = view.digits.and_then(|digits| digits.home.digit_at(col));
        header.push_str(&format!("{:>width$}", digit_label(digit), width = CELL_WIDTH));
    }
    lines.push(header);
    for row in 0..GRID_SIZE as usize {
        let digit = view.digits.and_then(|digits| digits.away.digit_at(row));
        let mut line = format!("{:>4}", digit_label(digit));
        for col in 0..GRID_SIZE as usize {
            let occupant = Cell::new(row as u32, col as u32)
                .ok()
                .and_then(|cell| view.grid.occupant(cell))
                .map_or_else(|| ".".to_string(), |player| fit(player.as_str()));
            line.push_str(&format!("{occupant:>width$}", width = CELL_WIDTH));
        }
        lines.push(line);
    }
    lines.join("\n") + "\n"
}

fn shown(value: Option<u32>) -> String {
    value.map_or_else(|| "-".to_string(), |value| value.to_string())
}

pub fn summary(view: &BoardView) -> String {
    let mut lines = vec![format!(
        "${} per square | {} claimed, {} empty | pot ${}",
        format_money(view.price_per_square),
        view.claimed,
        view.empty,
        format_money(view.pot)
    )];
    if !view.is_randomized() {
        lines.push("Numbers not assigned yet".to_string());
    }
    lines.extend(view.payouts.iter().map(|payout| {
        let score = view.scores.get(payout.quarter);
        format!(
            "{:<12} {:>3}-{:<3} ${:>9}  {}",
            payout.quarter.label(),
            shown(score.home),
            shown(score.away),
            format_money(payout.amount),
            payout.outcome
        )
    }));
    if !view.players.is_empty() {
        lines.push("Players:".to_string());
    }
    lines.extend(view.players.iter().map(|(player, stats)| {
        let won = view
            .winnings
            .get(player)
            .map(|amount| format!(", won ${}", format_money(*amount)))
            .unwrap_or_default();
        format!(
            "  {player}: {} squares, owes ${}{won}",
            stats.squares,
            format_money(stats.owed)
        )
    }));
    lines.join("\n") + "\n"
}

pub fn full(view: &BoardView) -> String {
    format!("{}\n{}", board(view), summary(view))
}

pub fn quarter_key_help() -> String {
    Quarter::ALL
        .iter()
        .map(|quarter| format!("{} ({})", quarter.key(), quarter.label()))
        .collect::<Vec<_>>()
        .join(", ")
}
