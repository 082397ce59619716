use anyhow::Result;
use colored::Colorize;
use rkb_game::MemoryPage;
use std::io::Write;
use std::time::Duration;

use super::SeedResult;

fn success_rate(results: &[SeedResult]) -> f64 {
    let total: usize = results.iter().map(|r| r.iterations_run).sum();
    let passed: usize = results.iter().map(|r| r.successful_iterations).sum();
    if total == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let rate = (passed as f64 / total as f64) * 100.0;
    rate
}

fn last_setup_line(result: &SeedResult) -> Option<String> {
    let view = &result.last.as_ref()?.view;
    let boards: Vec<_> = view.boards.iter().map(|b| b.value.as_str()).collect();
    let goals: Vec<_> = view.goals.iter().map(|g| g.value.as_str()).collect();
    Some(format!("{} | {}", boards.join(", "), goals.join(", ")))
}

pub fn generate_console_report(
    out: &mut dyn Write,
    results: &[SeedResult],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Setup Sweep Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "======================".cyan())?;

    let passed = results.iter().filter(|r| r.passed).count();
    writeln!(out, "Seeds: {}", results.len())?;
    writeln!(out, "Passed: {}", passed.to_string().green())?;
    writeln!(out, "Failed: {}", (results.len() - passed).to_string().red())?;
    writeln!(out, "Success rate: {:.1}%", success_rate(results))?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for result in results {
        let status = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };
        writeln!(out, "{} seed {}", status, result.seed.to_string().bold())?;
        writeln!(
            out,
            "   Iterations: {}/{} clean",
            result.successful_iterations, result.iterations_run
        )?;
        writeln!(out, "   Average time: {:?}", result.average_duration)?;
        if let Some(line) = last_setup_line(result) {
            writeln!(out, "   Last setup: {line}")?;
        }
        if !result.failures.is_empty() {
            writeln!(out, "   Failures:")?;
            for failure in &result.failures {
                writeln!(out, "     • {}", failure.red())?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, results: &[SeedResult]) -> Result<()> {
    let json_output = serde_json::to_string_pretty(results)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, results: &[SeedResult]) -> Result<()> {
    writeln!(out, "# Kingdom Builder Setup Sweep\n")?;

    let passed = results.iter().filter(|r| r.passed).count();
    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Seeds**: {}", results.len())?;
    writeln!(out, "- **Passed**: {passed}")?;
    writeln!(out, "- **Failed**: {}", results.len() - passed)?;
    writeln!(out, "- **Success rate**: {:.1}%\n", success_rate(results))?;

    writeln!(out, "## Seeds\n")?;
    for result in results {
        let status = if result.passed { "✅" } else { "❌" };
        writeln!(out, "### {status} {}\n", result.seed)?;
        writeln!(
            out,
            "- **Iterations**: {}/{} clean",
            result.successful_iterations, result.iterations_run
        )?;
        if let Some(line) = last_setup_line(result) {
            writeln!(out, "- **Last setup**: {line}")?;
        }
        if !result.failures.is_empty() {
            writeln!(out, "- **Failures**:")?;
            for failure in &result.failures {
                writeln!(out, "  - {failure}")?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

/// The page of the last run, as the browser would show it.
pub fn generate_html_report(out: &mut dyn Write, page: Option<&MemoryPage>) -> Result<()> {
    match page {
        Some(page) => write!(out, "{}", page.to_html())?,
        None => writeln!(out, "<!DOCTYPE html>\n<p>No setup was drawn.</p>")?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rkb_game::{BoardView, FieldView, SetupOutcome, ViewModel};

    fn sample(passed: bool) -> SeedResult {
        let view = ViewModel {
            boards: vec![BoardView {
                value: "Farm".into(),
                class_name: "base".into(),
                ..BoardView::default()
            }],
            goals: vec![FieldView::new("Lords", "base")],
            ..ViewModel::default()
        };
        SeedResult {
            seed: 7,
            passed,
            iterations_run: 2,
            successful_iterations: usize::from(passed) * 2,
            failures: if passed { Vec::new() } else { vec!["goals are out of box order".into()] },
            average_duration: Duration::from_millis(1),
            last: Some(SetupOutcome {
                view,
                ..SetupOutcome::default()
            }),
        }
    }

    #[test]
    fn markdown_lists_failures() {
        let mut out = Vec::new();
        generate_markdown_report(&mut out, &[sample(true), sample(false)]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("- **Failed**: 1"));
        assert!(text.contains("goals are out of box order"));
        assert!(text.contains("Farm | Lords"));
    }

    #[test]
    fn json_is_an_array_of_seeds() {
        let mut out = Vec::new();
        generate_json_report(&mut out, &[sample(true)]).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["seed"], 7);
        assert_eq!(value[0]["last"]["view"]["goals"][0]["value"], "Lords");
    }

    #[test]
    fn success_rate_counts_iterations() {
        let rate = success_rate(&[sample(true), sample(false)]);
        assert!((rate - 50.0).abs() < f64::EPSILON);
        assert!(success_rate(&[]).abs() < f64::EPSILON);
    }

    #[test]
    fn html_without_page_says_so() {
        let mut out = Vec::new();
        generate_html_report(&mut out, None).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("No setup was drawn"));
    }
}
