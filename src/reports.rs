use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use groupforge::scorer::{GroupId, SpecContribution};
use groupforge::table::ParticipantTable;

pub fn print_groups(
    table: &ParticipantTable,
    assignment: &[GroupId],
    num_groups: usize,
    label: usize,
) {
    let mut members: Vec<Vec<&str>> = vec![Vec::new(); num_groups];
    for (p, &g) in assignment.iter().enumerate() {
        members[g as usize].push(table.records[p][label].as_str());
    }

    let mut out = Table::new();
    out.load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    out.add_row(vec![
        Cell::new("Group").add_attribute(Attribute::Bold),
        Cell::new("Size"),
        Cell::new("Members"),
    ]);

    for (g, names) in members.iter().enumerate() {
        out.add_row(vec![
            Cell::new(g),
            Cell::new(names.len()),
            Cell::new(names.join(", ")),
        ]);
    }

    if let Some(col) = out.column_mut(1) {
        col.set_cell_alignment(CellAlignment::Right);
    }

    println!("{out}");
}

pub fn print_breakdown(contributions: &[SpecContribution], total: f64) {
    if contributions.is_empty() {
        println!("No objectives configured; every split costs 0.");
        return;
    }

    let mut out = Table::new();
    out.load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    out.add_row(vec![
        Cell::new("Column").add_attribute(Attribute::Bold),
        Cell::new("Objective"),
        Cell::new("Weight"),
        Cell::new("Cost").fg(Color::Cyan),
    ]);

    for c in contributions {
        out.add_row(vec![
            Cell::new(c.column),
            Cell::new(&c.objective),
            Cell::new(format!("{:.2}", c.weight)),
            Cell::new(format!("{:.4}", c.cost)).fg(Color::Cyan),
        ]);
    }

    out.add_row(vec![
        Cell::new("total").add_attribute(Attribute::Bold),
        Cell::new(""),
        Cell::new(""),
        Cell::new(format!("{:.4}", total))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
    ]);

    for i in 2..=3 {
        if let Some(col) = out.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    println!("{out}");
}
