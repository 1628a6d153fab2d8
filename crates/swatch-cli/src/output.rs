//! Palette rendering.

use anyhow::Result;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use serde::Serialize;
use swatch_core::{CategoryMap, CategoryState, ColorState, LadderStep, TextColor, TextColors};

/// JSON shape of a printed palette.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteReport<'a> {
    pub categories: &'a CategoryMap,
    pub text_colors: &'a TextColors,
}

impl<'a> PaletteReport<'a> {
    pub fn new(state: &'a ColorState) -> Self {
        Self {
            categories: state.current(),
            text_colors: state.text_colors(),
        }
    }
}

pub fn render_json(state: &ColorState) -> Result<String> {
    Ok(serde_json::to_string_pretty(&PaletteReport::new(state))?)
}

/// One row per ladder step of every category.
pub fn render_table(state: &ColorState) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Category"),
        header_cell("Relative to"),
        header_cell("Step"),
        header_cell("Hex"),
        header_cell("OKLCH"),
        header_cell("Text"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);

    for category in state.current().values() {
        for variant in &category.variants {
            let is_seed = variant.token.step == LadderStep::Seed;
            table.add_row(vec![
                category_cell(category, is_seed),
                relation_cell(category, is_seed),
                Cell::new(variant.token.step),
                hex_cell(&variant.hex_value, is_seed),
                Cell::new(&variant.computed_value),
                text_cell(variant.contrasting_text_color),
            ]);
        }
    }
    table
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
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

fn category_cell(category: &CategoryState, is_seed: bool) -> Cell {
    if !is_seed {
        return Cell::new("");
    }
    let cell = Cell::new(&category.category).add_attribute(Attribute::Bold);
    if category.has_changed {
        cell.fg(Color::Yellow)
    } else {
        cell
    }
}

fn relation_cell(category: &CategoryState, is_seed: bool) -> Cell {
    if !is_seed {
        Cell::new("")
    } else if category.is_relative {
        Cell::new(&category.relative_to)
    } else {
        dim_cell("-")
    }
}

fn hex_cell(hex: &str, is_seed: bool) -> Cell {
    let cell = Cell::new(hex);
    if is_seed {
        cell.add_attribute(Attribute::Bold)
    } else {
        cell
    }
}

fn text_cell(text: TextColor) -> Cell {
    match text {
        TextColor::Base => Cell::new("base"),
        TextColor::Contrast => dim_cell("contrast"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).add_attribute(Attribute::Dim)
}
