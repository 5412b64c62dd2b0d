/// Output formatting: terminal table and JSON.
use ahp_core::{
    gradation_labels, proportional_widths, ranked_alternatives, scale_value, AggregationResult,
    AnalysisResult, ConsistencyReport, ScaleFamily, ScaleTable,
};
use serde::Serialize;

use crate::bail;

#[derive(Serialize)]
struct JsonRankedAlternative {
    rank: usize,
    name: String,
    weight: f64,
}

#[derive(Serialize)]
struct JsonAnalysis<'a> {
    method: String,
    alternatives: Vec<JsonRankedAlternative>,
    matrix: Vec<Vec<f64>>,
    consistency: &'a ConsistencyReport,
}

#[derive(Serialize)]
struct JsonExpert<'a> {
    id: i64,
    name: String,
    weights: &'a [f64],
    lambda_max: f64,
    consistency_index: f64,
    consistency_ratio: f64,
}

#[derive(Serialize)]
struct JsonAggregation<'a> {
    method: String,
    num_experts: usize,
    alternatives: Vec<JsonRankedAlternative>,
    aggregated_matrix: Vec<Vec<f64>>,
    lambda_max: f64,
    consistency_index: f64,
    consistency_ratio: f64,
    is_consistent: bool,
    experts: Vec<JsonExpert<'a>>,
}

#[derive(Serialize)]
struct JsonGradation {
    gradation: usize,
    label: &'static str,
    table_value: f64,
    unified: f64,
    width_percent: f64,
}

#[derive(Serialize)]
struct JsonScale {
    family: String,
    gradations: usize,
    grade_values: Vec<f64>,
    table: Vec<JsonGradation>,
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| bail(format!("Failed to serialize output: {e}")))
}

fn ranked_json(weights: &[f64], names: &[String]) -> Vec<JsonRankedAlternative> {
    ranked_alternatives(weights)
        .into_iter()
        .map(|r| JsonRankedAlternative {
            rank: r.rank,
            name: names[r.index].clone(),
            weight: r.weight,
        })
        .collect()
}

fn name_width(names: &[String]) -> usize {
    names.iter().map(|n| n.chars().count()).max().unwrap_or(11).max(11) // at least "Alternative"
}

fn print_weights(weights: &[f64], names: &[String]) {
    let name_width = name_width(names);

    println!(" # | {:<name_width$} |  Weight", "Alternative");
    println!("---|-{}-|---------", "-".repeat(name_width));
    for r in ranked_alternatives(weights) {
        println!("{:>2} | {:<name_width$} | {:>7.4}", r.rank, names[r.index], r.weight);
    }
}

fn print_consistency(report: &ConsistencyReport) {
    println!(
        "\nlambda_max = {:.4} | CI = {:.4} | CR = {:.4}",
        report.lambda_max, report.ci, report.cr
    );
    for line in &report.recommendations {
        println!("{line}");
    }
}

/// Print a single-judge result as a formatted terminal table.
pub fn print_analysis_table(result: &AnalysisResult, names: &[String], method: &str) {
    print_weights(&result.weights, names);
    println!("\n{} alternatives ranked ({})", names.len(), method);
    print_consistency(&result.consistency);
}

/// Print a single-judge result as JSON.
pub fn print_analysis_json(result: &AnalysisResult, names: &[String], method: &str) {
    let output = JsonAnalysis {
        method: method.to_string(),
        alternatives: ranked_json(&result.weights, names),
        matrix: result.matrix.to_rows(),
        consistency: &result.consistency,
    };
    println!("{}", to_json(&output));
}

/// Print a group result as a formatted terminal table.
pub fn print_aggregation_table(result: &AggregationResult, names: &[String], expert_names: &[String]) {
    print_weights(&result.weights, names);
    println!(
        "\n{} alternatives ranked from {} experts ({})",
        names.len(),
        result.num_experts,
        result.method
    );
    println!(
        "Group lambda_max = {:.4} | CI = {:.4} | CR = {:.4} ({})",
        result.lambda_max,
        result.ci,
        result.cr,
        if result.is_consistent { "consistent" } else { "inconsistent" }
    );

    let expert_width = expert_names.iter().map(|n| n.chars().count()).max().unwrap_or(6).max(6);
    println!("\n{:<expert_width$} |     CR | Top choice", "Expert");
    println!("{}-|--------|-----------", "-".repeat(expert_width));
    for (expert, name) in result.individual.iter().zip(expert_names) {
        let top = ranked_alternatives(&expert.weights)
            .first()
            .map(|r| names[r.index].as_str())
            .unwrap_or("-");
        println!("{:<expert_width$} | {:>6.4} | {}", name, expert.cr, top);
    }
}

/// Print a group result as JSON.
pub fn print_aggregation_json(result: &AggregationResult, names: &[String], expert_names: &[String]) {
    let experts = result
        .individual
        .iter()
        .zip(expert_names)
        .map(|(e, name)| JsonExpert {
            id: e.expert_id,
            name: name.clone(),
            weights: &e.weights,
            lambda_max: e.lambda_max,
            consistency_index: e.ci,
            consistency_ratio: e.cr,
        })
        .collect();

    let output = JsonAggregation {
        method: result.method.to_string(),
        num_experts: result.num_experts,
        alternatives: ranked_json(&result.weights, names),
        aggregated_matrix: result.aggregated_matrix.to_rows(),
        lambda_max: result.lambda_max,
        consistency_index: result.ci,
        consistency_ratio: result.cr,
        is_consistent: result.is_consistent,
        experts,
    };
    println!("{}", to_json(&output));
}

fn scale_rows(table: &ScaleTable) -> Vec<JsonGradation> {
    let labels = table.labels();
    let widths = proportional_widths(table.gradations, table.family);
    (1..=table.gradations)
        .map(|g| JsonGradation {
            gradation: g,
            label: labels[g - 1],
            table_value: table.values[g - 1],
            unified: table.unify(g),
            width_percent: widths[g - 1],
        })
        .collect()
}

/// Print a scale family's values as a formatted terminal table.
pub fn print_scale_table(family: ScaleFamily, gradations: usize) {
    println!("Grade | Ratio ({family})");
    println!("------|-----------");
    for grade in 1..=9 {
        println!("{:>5} | {:>9.4}", grade, scale_value(grade, family));
    }

    let table = ScaleTable::new(family, gradations);
    let label_width = gradation_labels(table.gradations)
        .iter()
        .map(|l| l.len())
        .max()
        .unwrap_or(5)
        .max(5);

    println!("\n{} gradations", table.gradations);
    println!(" # | {:<label_width$} |   Value | Unified | Width %", "Label");
    println!("---|-{}-|---------|---------|--------", "-".repeat(label_width));
    for row in scale_rows(&table) {
        println!(
            "{:>2} | {:<label_width$} | {:>7.4} | {:>7.4} | {:>7.2}",
            row.gradation, row.label, row.table_value, row.unified, row.width_percent
        );
    }
}

/// Print a scale family's values as JSON.
pub fn print_scale_json(family: ScaleFamily, gradations: usize) {
    let table = ScaleTable::new(family, gradations);
    let output = JsonScale {
        family: family.to_string(),
        gradations: table.gradations,
        grade_values: (1..=9).map(|g| scale_value(g, family)).collect(),
        table: scale_rows(&table),
    };
    println!("{}", to_json(&output));
}
