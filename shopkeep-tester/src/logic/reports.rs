use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use std::time::Duration;

use super::AuditResult;

fn tally(results: &[AuditResult]) -> (usize, usize, f64) {
    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    #[allow(clippy::cast_precision_loss)]
    let rate = if total == 0 {
        0.0
    } else {
        (passed as f64 / total as f64) * 100.0
    };
    (total, passed, rate)
}

pub fn generate_console_report(
    out: &mut dyn Write,
    results: &[AuditResult],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Offer Audit Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "======================".cyan())?;

    let (total, passed, rate) = tally(results);
    writeln!(out, "Audited days: {total}")?;
    writeln!(out, "Passed: {}", passed.to_string().green())?;
    writeln!(out, "Failed: {}", (total - passed).to_string().red())?;
    writeln!(out, "Success rate: {rate:.1}%")?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for result in results {
        let status = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };
        writeln!(
            out,
            "{} {} day {} ({} checks)",
            status,
            result.world_seed.bold(),
            result.day,
            result.checks_run
        )?;
        for offer in &result.offers {
            writeln!(
                out,
                "   [{}] tier {} {:<8} risk {:.2} gold {}-{} eta {}d",
                offer.slot,
                offer.dungeon_tier,
                offer.objective,
                offer.base_risk,
                offer.gold_min,
                offer.gold_max,
                offer.eta_days
            )?;
        }
        for failure in &result.failures {
            writeln!(out, "     • {}", failure.red())?;
        }
    }
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, results: &[AuditResult]) -> Result<()> {
    let json_output = serde_json::to_string_pretty(results)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, results: &[AuditResult]) -> Result<()> {
    writeln!(out, "# Shopkeep Offer Audit\n")?;

    let (total, passed, rate) = tally(results);
    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Audited days**: {total}")?;
    writeln!(out, "- **Passed**: {passed}")?;
    writeln!(out, "- **Failed**: {}", total - passed)?;
    writeln!(out, "- **Success rate**: {rate:.1}%\n")?;

    writeln!(out, "## Detailed Results\n")?;
    for result in results {
        let status = if result.passed { "✅" } else { "❌" };
        writeln!(out, "### {} {} day {}\n", status, result.world_seed, result.day)?;
        writeln!(out, "| slot | seed | tier | objective | risk | gold | eta |")?;
        writeln!(out, "|---|---|---|---|---|---|---|")?;
        for offer in &result.offers {
            writeln!(
                out,
                "| {} | `{}` | {} | {} | {:.2} | {}-{} | {} |",
                offer.slot,
                offer.seed,
                offer.dungeon_tier,
                offer.objective,
                offer.base_risk,
                offer.gold_min,
                offer.gold_max,
                offer.eta_days
            )?;
        }
        if !result.failures.is_empty() {
            writeln!(out, "\n- **Failures**:")?;
            for failure in &result.failures {
                writeln!(out, "  - {failure}")?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn generate_csv_report(out: &mut dyn Write, results: &[AuditResult]) -> Result<()> {
    writeln!(
        out,
        "world_seed,day,slot,seed,dungeon_tier,objective,base_risk,gold_min,gold_max,eta_days,passed"
    )?;
    for result in results {
        for offer in &result.offers {
            writeln!(
                out,
                "{},{},{},{},{},{},{:.2},{},{},{},{}",
                result.world_seed,
                result.day,
                offer.slot,
                offer.seed,
                offer.dungeon_tier,
                offer.objective,
                offer.base_risk,
                offer.gold_min,
                offer.gold_max,
                offer.eta_days,
                result.passed
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::audit::audit_day;

    fn render(f: impl FnOnce(&mut dyn Write) -> Result<()>) -> String {
        let mut buf: Vec<u8> = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn csv_has_one_row_per_offer() {
        let results = vec![audit_day("arcadia", 17)];
        let csv = render(|out| generate_csv_report(out, &results));
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("world_seed,day,slot"));
        assert!(lines[1].starts_with("arcadia,17,0,arcadia:17:0,"));
    }

    #[test]
    fn markdown_lists_seeds() {
        let results = vec![audit_day("arcadia", 17)];
        let md = render(|out| generate_markdown_report(out, &results));
        assert!(md.contains("# Shopkeep Offer Audit"));
        assert!(md.contains("`arcadia:17:1`"));
    }

    #[test]
    fn console_handles_empty_results() {
        let text = render(|out| generate_console_report(out, &[], Duration::ZERO));
        assert!(text.contains("Audited days: 0"));
        assert!(text.contains("Success rate: 0.0%"));
    }

    #[test]
    fn json_is_parseable() {
        let results = vec![audit_day("bramble", 2)];
        let json = render(|out| generate_json_report(out, &results));
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["world_seed"], "bramble");
    }
}
