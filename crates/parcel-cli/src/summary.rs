use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use parcel_cli::pipeline::DedupOutcome;
use parcel_ingest::SourceCatalog;
use parcel_model::DedupStage;

pub fn print_summary(outcome: &DedupOutcome, show_merges: bool) {
    let config = &outcome.config;
    let summary = outcome.result.summary();
    println!("Input: {}", outcome.input.display());
    println!(
        "Source: {} (threshold {}, keys: {})",
        config.source(),
        config.fuzzy_threshold(),
        config.strict_key_fields().join(", ")
    );
    if let Some(path) = &outcome.outputs.survivors {
        println!("Survivors: {}", path.display());
    }
    if let Some(path) = &outcome.outputs.merges {
        println!("Merge report: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Input"),
        header_cell("Strict removed"),
        header_cell("Fuzzy removed"),
        header_cell("Survivors"),
        header_cell("Clustering"),
        header_cell("Partition"),
        header_cell("Time (ms)"),
    ]);
    apply_summary_table_style(&mut table);
    for index in [0, 1, 2, 3, 6] {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(summary.input).add_attribute(Attribute::Bold),
        count_cell(summary.strict_removed, Color::Yellow),
        count_cell(summary.fuzzy_removed, Color::Magenta),
        Cell::new(summary.survivors)
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        Cell::new(outcome.options.cluster_mode.as_str()),
        Cell::new(outcome.options.partition_mode.as_str()),
        dim_cell(outcome.duration_ms),
    ]);
    println!("{table}");

    if show_merges {
        print_merge_table(outcome);
    }
}

fn print_merge_table(outcome: &DedupOutcome) {
    let merges = &outcome.result.merges;
    if merges.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Removed"),
        header_cell("Survivor"),
        header_cell("Stage"),
        header_cell("Score"),
        header_cell("Key"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for merge in merges {
        table.add_row(vec![
            row_cell(outcome, merge.removed),
            row_cell(outcome, merge.survivor),
            stage_cell(merge.stage),
            merge.score.map_or_else(|| dim_cell("-"), Cell::new),
            merge
                .key
                .as_deref()
                .map_or_else(|| dim_cell("-"), Cell::new),
        ]);
    }
    println!();
    println!("Merges (batch position, then CSV line or JSON index in parentheses):");
    println!("{table}");
}

pub fn print_sources(catalog: &SourceCatalog) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Threshold"),
        header_cell("Key fields"),
        header_cell("Address fields"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for config in catalog.iter() {
        table.add_row(vec![
            Cell::new(config.source())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(config.fuzzy_threshold()),
            Cell::new(config.strict_key_fields().join(", ")),
            Cell::new(config.address_components().join(", ")),
        ]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn row_cell(outcome: &DedupOutcome, position: usize) -> Cell {
    match outcome.source_row(position) {
        Some(row) => Cell::new(format!("{position} ({row})")),
        None => Cell::new(position),
    }
}

fn stage_cell(stage: DedupStage) -> Cell {
    match stage {
        DedupStage::Strict => Cell::new(stage.as_str()).fg(Color::Yellow),
        DedupStage::Fuzzy => Cell::new(stage.as_str()).fg(Color::Magenta),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
