use comfy_table::{presets::UTF8_HORIZONTAL_ONLY, Attribute, Cell, ContentArrangement, Table};
use kernel::{format_size, Category, FileStats, MediaFile};

const TABLE_WIDTH: u16 = 120;

fn table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_HORIZONTAL_ONLY)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(TABLE_WIDTH)
        .set_header(
            header
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );
    table
}

/// Retention column text.
#[must_use]
pub fn retention(file: &MediaFile) -> String {
    if file.is_permanent {
        return "permanent".to_owned();
    }
    match file.expires_at() {
        Some(at) => format!("expires {}", at.format("%Y-%m-%d")),
        None => "7 days".to_owned(),
    }
}

#[must_use]
pub fn files_table(files: &[MediaFile]) -> Table {
    let mut table = table(&[
        "Id", "Name", "Type", "Category", "Size", "Retention", "Processed", "Created",
    ]);
    for f in files {
        table.add_row(vec![
            Cell::new(&f.id),
            Cell::new(&f.original_name),
            Cell::new(f.mime_subtype()),
            Cell::new(f.category().label()),
            Cell::new(format_size(f.file_size)),
            Cell::new(retention(f)),
            Cell::new(if f.processed { "yes" } else { "no" }),
            Cell::new(&f.created_at),
        ]);
    }
    table
}

#[must_use]
pub fn stats_table(stats: &FileStats) -> Table {
    let mut table = table(&["Category", "Files", "Size"]);
    for category in Category::SELECTABLE {
        let entry = stats.category(category);
        table.add_row(vec![
            Cell::new(category),
            Cell::new(entry.count),
            Cell::new(format_size(entry.size)),
        ]);
    }
    table.add_row(vec![
        Cell::new("total").add_attribute(Attribute::Bold),
        Cell::new(stats.total_files).add_attribute(Attribute::Bold),
        Cell::new(format_size(stats.total_size)).add_attribute(Attribute::Bold),
    ]);
    table
}
