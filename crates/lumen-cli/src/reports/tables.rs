use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use lumen_core::catalog::LampCatalog;
use lumen_core::color::is_hex_color;
use lumen_core::protocol::OptimizationResult;
use lumen_core::summary::ResultSummary;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Color cell tinted with the color it names.
fn swatch(hex: &str) -> Cell {
    let cell = Cell::new(hex);
    if !is_hex_color(hex) {
        return cell;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
    cell.fg(Color::Rgb {
        r: channel(1),
        g: channel(3),
        b: channel(5),
    })
}

fn align_right(table: &mut Table, columns: std::ops::RangeInclusive<usize>) {
    for i in columns {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
}

pub fn catalog(catalog: &LampCatalog) {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Id").add_attribute(Attribute::Bold),
        Cell::new("Name"),
        Cell::new("Cost"),
        Cell::new("Radius (m)"),
        Cell::new("Color"),
    ]);

    for lamp in catalog.iter() {
        table.add_row(vec![
            Cell::new(&lamp.id).add_attribute(Attribute::Bold),
            Cell::new(&lamp.name),
            Cell::new(format!("{:.2}", lamp.cost)),
            Cell::new(format!("{:.0}", lamp.radius)),
            swatch(&lamp.color),
        ]);
    }
    align_right(&mut table, 2..=3);

    println!("\n💡 Lamp catalog ({} types)", catalog.len());
    println!("{}", table);
}

pub fn summary(summary: &ResultSummary) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Status").add_attribute(Attribute::Bold),
        Cell::new(&summary.status),
    ]);
    table.add_row(vec![
        Cell::new("Coverage").add_attribute(Attribute::Bold),
        Cell::new(format!("{:.1}%", summary.coverage_pct)).fg(Color::Cyan),
    ]);
    table.add_row(vec![
        Cell::new("Lamps placed").add_attribute(Attribute::Bold),
        Cell::new(summary.lamps_placed),
    ]);
    table.add_row(vec![
        Cell::new("Points covered").add_attribute(Attribute::Bold),
        Cell::new(format!("{} / {}", summary.points_covered, summary.total_points)),
    ]);
    table.add_row(vec![
        Cell::new("Total cost").add_attribute(Attribute::Bold),
        Cell::new(format!("{:.2}", summary.total_cost)),
    ]);
    align_right(&mut table, 1..=1);

    println!("\n📊 Optimization results");
    println!("{}", table);
}

pub fn placements(result: &OptimizationResult) {
    if result.lamps.is_empty() {
        println!("No lamps placed.");
        return;
    }

    let mut table = new_table();
    table.set_header(vec![
        Cell::new("#"),
        Cell::new("Lon"),
        Cell::new("Lat"),
        Cell::new("Radius (m)"),
        Cell::new("Type"),
        Cell::new("Color"),
    ]);

    for (i, lamp) in result.lamps.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(format!("{:.6}", lamp.lon)),
            Cell::new(format!("{:.6}", lamp.lat)),
            Cell::new(format!("{:.0}", lamp.radius)),
            Cell::new(lamp.lamp_type.as_deref().unwrap_or("-")),
            swatch(&lamp.color),
        ]);
    }
    align_right(&mut table, 0..=3);

    println!("{}", table);
}
