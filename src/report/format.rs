//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the fitting and selection code stays clean and testable
//! - output changes are localized

use crate::data::{ColumnSummary, CorrelationMatrix};
use crate::domain::{EliminationStep, FittedModel, MainEffectPolicy};
use crate::report::{Diagnostics, RunReport};

/// Format the full `select` summary: data, elimination log, final model, extras.
pub fn format_run_summary(report: &RunReport) -> String {
    let mut out = String::new();

    out.push_str("=== backelim - backward elimination by nested F tests ===\n");
    out.push_str(&format!("Data: {}\n", report.data_path));
    out.push_str(&format!(
        "Rows: read={} | used={} | dropped (incomplete)={}\n",
        report.rows_read, report.rows_used, report.rows_dropped
    ));
    out.push_str(&format!(
        "Alpha: {} | main effects: {}\n",
        report.alpha,
        match report.main_effects {
            MainEffectPolicy::Keep => "keep (validate only)",
            MainEffectPolicy::Drop => "drop if not significant",
        }
    ));
    out.push_str(&format!("Full model: {}\n", report.full_model.spec));
    out.push_str(&format!(
        "  terms={} | RSS={:.4} | R²={:.4}\n",
        report.full_model.spec.terms.len(),
        report.full_model.rss,
        report.full_model.r_squared
    ));

    out.push_str("\nElimination log:\n");
    out.push_str(&format_elimination_log(&report.steps));

    out.push_str("\nFinal model:\n");
    out.push_str(&format_model(&report.final_model));

    if let Some(z) = &report.standardized {
        out.push_str("\nStandardized coefficients (main effects, z-scored data):\n");
        out.push_str(&format_standardized(z));
    } else if let Some(column) = &report.degenerate_column {
        out.push_str(&format!(
            "\nStandardized coefficients skipped: `{column}` has zero variance.\n"
        ));
    }

    out.push_str("\nDiagnostics:\n");
    out.push_str(&format_diagnostics(&report.diagnostics));

    out
}

/// One row per comparison: level, candidate term, F, df, p and the decision.
pub fn format_elimination_log(steps: &[EliminationStep]) -> String {
    let mut out = String::new();
    if steps.is_empty() {
        out.push_str("(no comparisons)\n");
        return out;
    }

    push_row(
        &mut out,
        format!(
            "{:>5} {:<36} {:>10} {:>8} {:>10} {:<8}",
            "level", "term", "F", "df", "p", "decision"
        ),
    );
    push_row(
        &mut out,
        format!("{:-<5} {:-<36} {:-<10} {:-<8} {:-<10} {:-<8}", "", "", "", "", "", ""),
    );

    for s in steps {
        let c = &s.comparison;
        let decision = if s.removed {
            "removed"
        } else if c.significant {
            "kept"
        } else {
            "kept*"
        };
        push_row(
            &mut out,
            format!(
                "{:>5} {:<36} {:>10.4} {:>8} {:>10} {:<8}",
                s.level,
                truncate(&s.term.to_string(), 36),
                c.f_statistic,
                format!("{},{}", c.df, c.df_residual),
                fmt_p(c.p_value),
                decision,
            ),
        );
    }

    if steps.iter().any(|s| !s.removed && !s.comparison.significant) {
        out.push_str("* not significant, retained by the main-effect policy\n");
    }
    out
}

/// R-style coefficient table plus fit statistics.
pub fn format_model(model: &FittedModel) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", model.spec));

    push_row(
        &mut out,
        format!(
            "{:<36} {:>12} {:>12} {:>9} {:>10}",
            "coefficient", "estimate", "std.error", "t", "p"
        ),
    );
    push_row(&mut out, format!("{:-<36} {:-<12} {:-<12} {:-<9} {:-<10}", "", "", "", "", ""));
    for c in &model.coefficients {
        push_row(
            &mut out,
            format!(
                "{:<36} {:>12.6} {:>12.6} {:>9.3} {:>10} {}",
                truncate(&c.name, 36),
                c.estimate,
                c.std_error,
                c.t_value,
                fmt_p(c.p_value),
                stars(c.p_value),
            ),
        );
    }
    out.push_str("Signif. codes: *** < 0.001 < ** < 0.01 < * < 0.05 < . < 0.1\n");

    out.push_str(&format!(
        "Residual standard error: {:.4} on {} degrees of freedom\n",
        model.sigma, model.df_residual
    ));
    out.push_str(&format!(
        "R²: {:.4} | adjusted R²: {:.4} | n={}\n",
        model.r_squared, model.adj_r_squared, model.n_obs
    ));
    if let Some(f) = &model.overall_f {
        out.push_str(&format!(
            "F-statistic: {:.3} on {} and {} DF, p-value: {}\n",
            f.f_statistic,
            f.df_model,
            f.df_residual,
            fmt_p(f.p_value)
        ));
    }
    out
}

/// Slopes of a model fitted on z-scored data, largest magnitude first.
pub fn format_standardized(model: &FittedModel) -> String {
    let mut rows: Vec<_> = model.coefficients.iter().skip(1).collect();
    rows.sort_by(|a, b| b.estimate.abs().total_cmp(&a.estimate.abs()));

    let mut out = String::new();
    for c in rows {
        push_row(
            &mut out,
            format!("  {:<34} {:>9.4} {}", truncate(&c.name, 34), c.estimate, stars(c.p_value)),
        );
    }
    out
}

pub fn format_diagnostics(diag: &Diagnostics) -> String {
    let mut out = String::new();

    if let Some(r) = &diag.residuals {
        out.push_str(&format!(
            "Residuals: min={:.4} q1={:.4} median={:.4} q3={:.4} max={:.4}\n",
            r.min, r.q1, r.median, r.q3, r.max
        ));
    }

    match &diag.durbin_watson {
        Some(dw) => out.push_str(&format!(
            "Durbin-Watson: {:.4} (lag-1 autocorrelation {:.4})\n",
            dw.statistic, dw.autocorrelation
        )),
        None => out.push_str("Durbin-Watson: n/a\n"),
    }

    if diag.vif.is_empty() {
        out.push_str("VIF: n/a (fewer than two predictors)\n");
    } else {
        out.push_str("VIF:\n");
        for v in &diag.vif {
            let flag = if v.vif > 10.0 {
                "  (severe)"
            } else if v.vif > 5.0 {
                "  (high)"
            } else {
                ""
            };
            push_row(
                &mut out,
                format!("  {:<34} {:>9.3}{flag}", truncate(&v.variable, 34), v.vif),
            );
        }
    }
    out
}

/// Column summaries and, if available, the correlation matrix.
pub fn format_exploration(
    data_path: &str,
    rows: usize,
    summaries: &[ColumnSummary],
    correlations: Option<&CorrelationMatrix>,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== backelim - explore {data_path} ===\n"));
    out.push_str(&format!("Rows: {rows} | columns: {}\n\n", summaries.len()));

    push_row(
        &mut out,
        format!(
            "{:<24} {:<7} {:>7} {:>7} {:>10} {:>10} {:>10} {:>10} {:>10}",
            "column", "kind", "n", "missing", "mean", "sd", "min", "median", "max"
        ),
    );
    push_row(
        &mut out,
        format!(
            "{:-<24} {:-<7} {:-<7} {:-<7} {:-<10} {:-<10} {:-<10} {:-<10} {:-<10}",
            "", "", "", "", "", "", "", "", ""
        ),
    );
    for s in summaries {
        push_row(
            &mut out,
            format!(
                "{:<24} {:<7} {:>7} {:>7} {:>10} {:>10} {:>10} {:>10} {:>10}",
                truncate(&s.name, 24),
                if s.numeric { "numeric" } else { "text" },
                s.present,
                s.missing,
                fmt_opt(s.mean),
                fmt_opt(s.sd),
                fmt_opt(s.min),
                fmt_opt(s.median),
                fmt_opt(s.max),
            ),
        );
    }

    if let Some(m) = correlations {
        out.push_str("\nPearson correlations (complete cases):\n");
        let mut header = format!("{:<24}", "");
        for name in &m.names {
            header.push_str(&format!(" {:>10}", truncate(name, 10)));
        }
        push_row(&mut out, header);
        for (name, row) in m.names.iter().zip(&m.values) {
            let mut line = format!("{:<24}", truncate(name, 24));
            for v in row {
                line.push_str(&format!(" {v:>10.3}"));
            }
            push_row(&mut out, line);
        }
    }
    out
}

fn push_row(out: &mut String, row: String) {
    out.push_str(row.trim_end());
    out.push('\n');
}

fn fmt_p(p: f64) -> String {
    if p.is_nan() {
        "NA".to_string()
    } else if p < 1e-4 {
        format!("{p:.2e}")
    } else {
        format!("{p:.4}")
    }
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|x| format!("{x:.4}")).unwrap_or_else(|| "-".to_string())
}

fn stars(p: f64) -> &'static str {
    match p {
        p if p < 0.001 => "***",
        p if p < 0.01 => "**",
        p if p < 0.05 => "*",
        p if p < 0.1 => ".",
        _ => "",
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
