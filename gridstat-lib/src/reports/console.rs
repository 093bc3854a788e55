use super::{Report, common};
use crate::Result;
use crate::cache::CacheStats;
use crate::engine::{Comparison, EngineResult, SubjectInfo};
use crate::metrics::{MetricCategory, MetricResult};
use crate::registry::MetricInfo;
use crate::tables::SeasonFilter;
use compact_str::CompactString;
use core::fmt::Write;
use owo_colors::OwoColorize;
use std::collections::BTreeMap;
use strum::IntoEnumIterator;
use terminal_size::{Width, terminal_size};

pub fn generate<W: Write>(report: &Report<'_>, use_colors: bool, writer: &mut W) -> Result<()> {
    match report {
        Report::Catalog(metrics) => generate_catalog(metrics, use_colors, writer),
        Report::Results { subject, season, outcomes } => generate_results(subject, *season, outcomes, use_colors, writer),
        Report::Comparison(comparison) => generate_comparison(comparison, use_colors, writer),
        Report::CacheStats(stats) => generate_cache_stats(stats, writer),
        Report::CacheCleared { metric, removed } => {
            match metric {
                Some(name) => writeln!(writer, "Removed {removed} cached result(s) for '{name}'")?,
                None => writeln!(writer, "Removed {removed} cached result(s)")?,
            }
            Ok(())
        }
    }
}

fn heading<W: Write>(writer: &mut W, text: &str, use_colors: bool) -> Result<()> {
    if use_colors {
        writeln!(writer, "{}", text.bold())?;
    } else {
        writeln!(writer, "{text}")?;
    }
    Ok(())
}

fn generate_catalog<W: Write>(metrics: &[MetricInfo], use_colors: bool, writer: &mut W) -> Result<()> {
    let mut by_category: BTreeMap<MetricCategory, Vec<&MetricInfo>> = BTreeMap::new();
    for info in metrics {
        by_category.entry(info.category).or_default().push(info);
    }

    let term_width = get_terminal_width();
    let mut first = true;

    // Display metrics grouped by category
    for category in MetricCategory::iter() {
        let Some(infos) = by_category.get(&category) else {
            continue;
        };

        if !first {
            writeln!(writer)?;
        }
        first = false;
        heading(writer, &category.to_string(), use_colors)?;

        let max_name_len = infos.iter().map(|m| m.name.len()).max().unwrap_or(0);

        // Indent for description lines: "  " (2) + metric_name + " : " (3)
        let value_indent = 2 + max_name_len + 3;

        for info in infos {
            let text = format!("{} [{}, {}]", info.description, info.unit, common::format_direction(info.direction));
            let wrapped_lines = wrap_text(&text, term_width, value_indent);

            if let Some(first_line) = wrapped_lines.first() {
                writeln!(writer, "  {:<width$} : {first_line}", info.name, width = max_name_len)?;
                for line in wrapped_lines.iter().skip(1) {
                    writeln!(writer, "{line}")?;
                }
            }
        }
    }

    Ok(())
}

fn generate_results<W: Write>(
    subject: &SubjectInfo,
    season: SeasonFilter,
    outcomes: &[(CompactString, EngineResult<MetricResult>)],
    use_colors: bool,
    writer: &mut W,
) -> Result<()> {
    heading(writer, &format!("{} ({}), {season}", subject.name, subject.subject), use_colors)?;

    let max_name_len = outcomes.iter().map(|(name, _)| name.len()).max().unwrap_or(0);

    for (name, outcome) in outcomes {
        match outcome {
            EngineResult::Found(result) => {
                let value = common::format_metric_value(&result.value, result.unit);
                let value = if use_colors && !result.is_valid() {
                    value.yellow().to_string()
                } else {
                    value
                };
                writeln!(
                    writer,
                    "  {name:<max_name_len$} : {value} (sample size {})",
                    result.sample_size
                )?;

                for (key, meta) in &result.metadata {
                    writeln!(writer, "  {:max_name_len$}   {key}: {}", "", common::format_meta_value(meta))?;
                }
            }
            failure => {
                let message = failure.to_string();
                let message = if use_colors { message.red().to_string() } else { message };
                writeln!(writer, "  {name:<max_name_len$} : {message}")?;
            }
        }
    }

    Ok(())
}

fn generate_comparison<W: Write>(comparison: &Comparison, use_colors: bool, writer: &mut W) -> Result<()> {
    heading(
        writer,
        &format!("Comparison, {} ({} scores)", comparison.season, comparison.scale),
        use_colors,
    )?;

    let name_width = comparison
        .metrics
        .iter()
        .map(|m| m.metric.len())
        .chain(core::iter::once("overall".len()))
        .max()
        .unwrap_or(0);

    let cells: Vec<Vec<String>> = comparison
        .metrics
        .iter()
        .map(|m| {
            m.entries
                .iter()
                .map(|e| {
                    format!(
                        "{} [{}]",
                        common::format_metric_value(&e.result.value, e.result.unit),
                        common::format_score(e.score)
                    )
                })
                .collect()
        })
        .collect();

    let column_widths: Vec<usize> = comparison
        .subjects
        .iter()
        .enumerate()
        .map(|(i, s)| {
            cells
                .iter()
                .filter_map(|row| row.get(i).map(String::len))
                .chain([s.name.len(), common::format_score(comparison.overall.get(i).copied().flatten()).len()])
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut line = format!("  {:name_width$}", "");
    for (subject, width) in comparison.subjects.iter().zip(&column_widths) {
        line.push_str(&format!("  {:<width$}", subject.name));
    }
    writeln!(writer, "{}", line.trim_end())?;

    for (metric, row) in comparison.metrics.iter().zip(&cells) {
        let leader = metric.leader();
        let mut line = format!("  {:<name_width$}", metric.metric);
        for ((entry, cell), width) in metric.entries.iter().zip(row).zip(&column_widths) {
            let padded = format!("{cell:<width$}");
            if use_colors && leader == Some(entry.result.subject) {
                line.push_str(&format!("  {}", padded.green().bold()));
            } else {
                line.push_str(&format!("  {padded}"));
            }
        }
        writeln!(writer, "{}", line.trim_end())?;
    }

    let mut line = format!("  {:<name_width$}", "overall");
    for (score, width) in comparison.overall.iter().zip(&column_widths) {
        line.push_str(&format!("  {:<width$}", common::format_score(*score)));
    }
    writeln!(writer, "{}", line.trim_end())?;

    Ok(())
}

fn generate_cache_stats<W: Write>(stats: &CacheStats, writer: &mut W) -> Result<()> {
    let state = if stats.enabled { "enabled" } else { "disabled" };
    writeln!(writer, "Cache {state}, entries expire after {}", humantime_serde::re::humantime::format_duration(stats.ttl))?;
    writeln!(writer, "  entries  : {}", stats.entry_count)?;
    writeln!(writer, "  size     : {}", common::format_bytes(stats.total_size_bytes))?;
    writeln!(writer, "  hits     : {}", stats.hit_count)?;
    writeln!(writer, "  misses   : {}", stats.miss_count)?;
    writeln!(writer, "  expired  : {}", stats.expired_count)?;
    writeln!(writer, "  corrupt  : {}", stats.corrupt_count)?;
    if stats.stale_count > 0 {
        writeln!(
            writer,
            "  stale    : {} ({}), removed by the next `cache clear`",
            stats.stale_count,
            common::format_bytes(stats.stale_size_bytes)
        )?;
    }
    Ok(())
}

/// Get the terminal width, defaulting to 80 if not detectable
fn get_terminal_width() -> usize {
    terminal_size().map_or(80, |(Width(w), _)| w as usize)
}

/// Word-wrap text to fit within a given width, with indentation for continuation lines
fn wrap_text(text: &str, width: usize, indent: usize) -> Vec<String> {
    if width <= indent {
        // Not enough space, return single line
        return vec![text.to_string()];
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current_line = String::new();

    // Every line starts at `indent`; only continuation lines are padded here
    for word in text.split_whitespace() {
        let separator_len = usize::from(!current_line.is_empty());
        if !current_line.is_empty() && indent + current_line.len() + separator_len + word.len() > width {
            let pad = if lines.is_empty() { 0 } else { indent };
            lines.push(format!("{:pad$}{current_line}", ""));
            current_line = word.to_string();
        } else {
            if !current_line.is_empty() {
                current_line.push(' ');
            }
            current_line.push_str(word);
        }
    }

    if !current_line.is_empty() || lines.is_empty() {
        let pad = if lines.is_empty() { 0 } else { indent };
        lines.push(format!("{:pad$}{current_line}", ""));
    }

    lines
}
