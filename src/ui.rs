use std::io::{self, BufRead, IsTerminal, Write};

use colored::*;
use slug::slugify;

use crate::{
    models::{area::Area, persona::Persona},
    services::{areas::find_area, results::ChartDataset, results::ResultsSnapshot},
};

const MAX_LABEL_WIDTH: usize = 24;
const MIN_BAR_WIDTH: usize = 10;

/// Get the terminal width, defaulting to 80 if unavailable
fn get_terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
}

/// Prompts and retries only make sense when a person is at the keyboard
pub fn is_interactive() -> bool {
    io::stdin().is_terminal() && io::stdout().is_terminal()
}

/// Render a view header with title and optional count
pub fn render_view_header(title: &str, count: Option<(usize, &str)>) {
    match count {
        Some((n, noun)) => {
            let noun = if n == 1 {
                noun.to_string()
            } else {
                format!("{noun}s")
            };
            println!("\n  {} ({} {})\n", title.cyan().bold(), n, noun);
        }
        None => println!("\n  {}\n", title.cyan().bold()),
    }
}

pub fn render_success(message: &str) {
    println!("{} {}", "✓".green(), message.green());
}

pub fn render_error(message: &str) {
    eprintln!("{} {}", "Error:".red().bold(), message);
}

pub fn render_hint(message: &str) {
    eprintln!("  {}", message.dimmed());
}

pub fn render_areas(areas: &[Area]) {
    if areas.is_empty() {
        println!("No areas available");
        return;
    }

    render_view_header("AREAS", Some((areas.len(), "area")));
    for area in areas {
        println!(
            "  {:>3}  {}  {}",
            area.id.to_string().dimmed(),
            area.name.bold(),
            slugify(&area.name).dimmed()
        );
    }
    println!();
}

pub fn render_personas(personas: &[Persona], areas: &[Area]) {
    if personas.is_empty() {
        println!("No people registered yet");
        return;
    }

    render_view_header("PEOPLE", Some((personas.len(), "person")));
    for persona in personas {
        let area_name = find_area(areas, persona.area_id)
            .map(|area| area.name.clone())
            .unwrap_or_else(|| format!("area #{}", persona.area_id));
        println!(
            "  {:>3}  {}  {}  {}",
            persona.id.to_string().dimmed(),
            persona.name.bold(),
            persona.email,
            area_name.blue()
        );
    }
    println!();
}

/// Render the results view: bar chart plus total
pub fn render_results(snapshot: &ResultsSnapshot) {
    render_view_header("RESULTS", Some((snapshot.counts.len(), "area")));

    if snapshot.counts.is_empty() {
        println!("  No areas to show\n");
        return;
    }

    println!("  {}\n", snapshot.chart.label.dimmed());
    for (line, value) in chart_lines(&snapshot.chart, get_terminal_width())
        .into_iter()
        .zip(&snapshot.chart.values)
    {
        let styled_bar = line.bar.blue();
        println!("  {}  {} {}", line.label.bold(), styled_bar, value);
    }

    println!(
        "\n  {} {}\n",
        "Total people:".dimmed(),
        snapshot.total.to_string().bold()
    );
}

/// One chart row before styling
#[derive(Debug, PartialEq, Eq)]
struct ChartLine {
    label: String,
    bar: String,
}

fn chart_lines(dataset: &ChartDataset, terminal_width: usize) -> Vec<ChartLine> {
    let label_width = dataset
        .labels
        .iter()
        .map(|label| label.chars().count())
        .max()
        .unwrap_or(0)
        .min(MAX_LABEL_WIDTH);
    let value_width = dataset
        .values
        .iter()
        .map(|value| value.to_string().len())
        .max()
        .unwrap_or(1);
    let bar_width = terminal_width
        .saturating_sub(label_width + value_width + 6)
        .max(MIN_BAR_WIDTH);
    let max_value = dataset.values.iter().copied().max().unwrap_or(0);

    dataset
        .labels
        .iter()
        .zip(&dataset.values)
        .map(|(label, value)| ChartLine {
            label: fit_label(label, label_width),
            bar: "█".repeat(bar_length(*value, max_value, bar_width)),
        })
        .collect()
}

/// Scales `value` against `max_value`; any non-zero value gets at least one cell
fn bar_length(value: u64, max_value: u64, bar_width: usize) -> usize {
    if value == 0 || max_value == 0 {
        return 0;
    }
    let scaled = (u128::from(value) * bar_width as u128 + u128::from(max_value) / 2)
        / u128::from(max_value);
    usize::try_from(scaled).unwrap_or(bar_width).clamp(1, bar_width)
}

fn fit_label(label: &str, width: usize) -> String {
    let length = label.chars().count();
    if length <= width {
        format!("{label}{}", " ".repeat(width - length))
    } else {
        let mut truncated: String = label.chars().take(width.saturating_sub(1)).collect();
        truncated.push('…');
        truncated
    }
}

/// Format the login instant for display (e.g., "today at 14:05", "Feb 15 at 09:30")
pub fn format_login_instant(timestamp: jiff::Timestamp) -> String {
    let zoned = jiff::Zoned::new(timestamp, jiff::tz::TimeZone::system());
    let today = jiff::Zoned::now().date();

    if zoned.date() == today {
        format!("today at {}", zoned.strftime("%H:%M"))
    } else {
        zoned.strftime("%b %d at %H:%M").to_string()
    }
}

/// Reads one line after printing `label`. `None` on end of input.
pub fn prompt(label: &str) -> io::Result<Option<String>> {
    print!("{} ", format!("{label}:").bold());
    io::stdout().flush()?;

    let mut line = String::new();
    let read = io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

pub fn confirm(question: &str) -> io::Result<bool> {
    let answer = prompt(&format!("{question} [y/N]"))?;
    Ok(matches!(
        answer.as_deref().map(str::trim),
        Some("y" | "Y" | "yes" | "s" | "si" | "sí")
    ))
}
