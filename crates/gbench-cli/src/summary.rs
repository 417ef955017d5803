use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use gbench_core::DatasetDownload;
use gbench_report::{LabelDistribution, MetricReport};

use crate::types::{FilterOutcome, ProcessOutcome};

pub fn print_process_summary(outcome: &ProcessOutcome) {
    println!("Dataset: {}/{}", outcome.task, outcome.dataset);
    println!("Output: {}", outcome.output.display());
    println!("{}", stage_table(outcome));

    if let Some(derive) = &outcome.report.derive {
        if derive.unmatched_dropped > 0 {
            println!("Rows without annotation dropped: {}", derive.unmatched_dropped);
        }
        if derive.strand_defaulted > 0 {
            println!("Rows with defaulted strand: {}", derive.strand_defaulted);
        }
    }
    if let Some(reference) = &outcome.report.reference {
        println!(
            "Reference alleles: {}/{} match ({:.2}%), {} lookups failed",
            reference.matching,
            reference.total,
            reference.match_rate * 100.0,
            reference.failed,
        );
    }
    if let Some(distribution) = &outcome.distribution {
        println!("{}", distribution_table(distribution));
    }
    if let Some(vcf) = &outcome.vcf {
        println!("Positive VCF: {}", vcf.positive.display());
        println!("Negative VCF: {}", vcf.negative.display());
        println!("VCF summary: {}", vcf.summary.display());
    }
}

pub fn stage_table(outcome: &ProcessOutcome) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Stage"), header_cell("Rows")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![dim_cell("input"), Cell::new(outcome.report.rows_in)]);
    for stage in &outcome.stages {
        table.add_row(vec![Cell::new(&stage.stage), Cell::new(stage.rows)]);
    }
    table
}

pub fn metrics_table(report: &MetricReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![
        Cell::new("AUROC"),
        Cell::new(format!("{:.4}", report.auroc)).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("AUPRC"),
        Cell::new(format!("{:.4}", report.auprc)).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![Cell::new("Samples"), Cell::new(report.n_samples)]);
    table.add_row(vec![Cell::new("Positives"), Cell::new(report.n_positive)]);
    table
}

pub fn distribution_table(distribution: &LabelDistribution) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Label"),
        header_cell("Count"),
        header_cell("Percent"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for (label, count) in &distribution.counts {
        let percent = distribution.percentages.get(label).copied().unwrap_or(0.0);
        table.add_row(vec![
            label_cell(*label),
            Cell::new(count),
            Cell::new(format!("{percent:.2}%")),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(distribution.total).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    table.add_row(vec![
        Cell::new("pos/neg"),
        Cell::new(format!("{:.4}", distribution.positive_negative_ratio)),
        dim_cell("-"),
    ]);
    table
}

pub fn print_download(download: &DatasetDownload) {
    println!("Data: {}", download.data.display());
    println!("Info: {}", download.info.display());
    if let Some(raw) = &download.raw {
        println!("Raw: {}", raw.display());
    }
}

pub fn print_filter(outcome: &FilterOutcome) {
    println!(
        "Kept {} of {} rows -> {}",
        outcome.rows_out,
        outcome.rows_in,
        outcome.output.display()
    );
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn label_cell(label: i64) -> Cell {
    match label {
        1 => Cell::new("1 (positive)").fg(Color::Green),
        0 => Cell::new("0 (negative)").fg(Color::Blue),
        other => Cell::new(other).fg(Color::Yellow),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
