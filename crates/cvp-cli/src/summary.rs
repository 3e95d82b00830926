//! Terminal rendering for command results.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use cvp_core::{ImportSummary, SweepSummary};
use cvp_map::MappingSuggestion;
use cvp_model::{AuditItem, CanonicalField, Contract, ContractStatus, Department, cnpj};

pub fn print_import_summary(summary: &ImportSummary) {
    let mut table = new_table(vec![
        header_cell("Queued"),
        header_cell("Duplicates"),
        header_cell("Skipped"),
        header_cell("Total"),
    ]);
    for index in 0..4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        count_cell(summary.queued, Color::Green),
        count_cell(summary.duplicates, Color::Yellow),
        count_cell(summary.skipped, Color::Red),
        Cell::new(summary.total()).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

pub fn print_suggestions(suggestions: &[MappingSuggestion]) {
    if suggestions.is_empty() {
        println!("no columns could be mapped");
        return;
    }
    let mut table = new_table(vec![
        header_cell("Source column"),
        header_cell("Field"),
        header_cell("Confidence"),
    ]);
    align_column(&mut table, 2, CellAlignment::Right);
    for suggestion in suggestions {
        let confidence = Cell::new(format!("{:.2}", suggestion.confidence));
        let confidence = if suggestion.confidence >= 1.0 {
            confidence.fg(Color::Green)
        } else {
            confidence.fg(Color::Yellow)
        };
        table.add_row(vec![
            Cell::new(&suggestion.source_column),
            Cell::new(suggestion.field.as_str()),
            confidence,
        ]);
    }
    println!("{table}");
}

pub fn print_fields() {
    let mut table = new_table(vec![header_cell("Field"), header_cell("Required")]);
    align_column(&mut table, 1, CellAlignment::Center);
    for field in CanonicalField::ALL {
        let required = CanonicalField::REQUIRED.contains(&field);
        table.add_row(vec![
            Cell::new(field.as_str()),
            if required {
                Cell::new("✓").fg(Color::Green)
            } else {
                dim_cell("-")
            },
        ]);
    }
    println!("{table}");
}

pub fn print_audit_items(items: &[AuditItem]) {
    if items.is_empty() {
        println!("audit queue is empty");
        return;
    }
    let mut table = new_table(vec![
        header_cell("Item"),
        header_cell("CNPJ"),
        header_cell("Supplier"),
        header_cell("Imported"),
        header_cell("Status"),
    ]);
    for item in items {
        table.add_row(vec![
            Cell::new(item.id),
            Cell::new(item.source_data.cnpj.as_deref().unwrap_or("-")),
            Cell::new(item.source_data.razao_social.as_deref().unwrap_or("-")),
            Cell::new(item.import_date.format("%Y-%m-%d")),
            Cell::new(item.status),
        ]);
    }
    println!("{table}");
}

pub fn print_contracts(contracts: &[Contract]) {
    if contracts.is_empty() {
        println!("no contracts match");
        return;
    }
    let mut table = new_table(vec![
        header_cell("Contract"),
        header_cell("Supplier"),
        header_cell("CNPJ"),
        header_cell("Status"),
        header_cell("Value"),
        header_cell("Ends"),
        header_cell("Notice"),
    ]);
    align_column(&mut table, 4, CellAlignment::Right);
    for contract in contracts {
        table.add_row(vec![
            Cell::new(contract.id),
            Cell::new(&contract.supplier_name),
            Cell::new(cnpj::format(&contract.cnpj)),
            status_cell(contract.status),
            Cell::new(format!("{:.2}", contract.value_total)),
            Cell::new(contract.end_date),
            Cell::new(contract.notice_deadline()),
        ]);
    }
    println!("{table}");
}

pub fn print_sweep_summary(summary: &SweepSummary) {
    let mut table = new_table(vec![
        header_cell("Processed"),
        header_cell("Created"),
        header_cell("Failed"),
    ]);
    for index in 0..3 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(summary.processed),
        count_cell(summary.created, Color::Green),
        count_cell(summary.failed, Color::Red),
    ]);
    println!("{table}");
}

pub fn print_departments(departments: &[Department]) {
    if departments.is_empty() {
        println!("no departments yet");
        return;
    }
    let mut table = new_table(vec![
        header_cell("Department"),
        header_cell("Name"),
        header_cell("Description"),
    ]);
    for department in departments {
        table.add_row(vec![
            Cell::new(department.id),
            Cell::new(&department.name),
            match &department.description {
                Some(text) => Cell::new(text),
                None => dim_cell("-"),
            },
        ]);
    }
    println!("{table}");
}

fn new_table(headers: Vec<Cell>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
    table.set_header(headers);
    table
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn status_cell(status: ContractStatus) -> Cell {
    let cell = Cell::new(status);
    match status {
        ContractStatus::Active => cell.fg(Color::Green),
        ContractStatus::PendingApproval => cell.fg(Color::Yellow),
        ContractStatus::Rejected => cell.fg(Color::Red),
        ContractStatus::Closed => cell.fg(Color::DarkGrey),
    }
}

fn count_cell(value: usize, color: Color) -> Cell {
    if value > 0 {
        Cell::new(value).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(value)
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
