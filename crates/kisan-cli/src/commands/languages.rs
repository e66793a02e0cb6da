use anyhow::Result;
use comfy_table::{Cell, Table};
use kisan_ai::Language;

pub fn run() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Code", "Language", "Flag", "Speech"]);

    for language in Language::ALL {
        let info = language.info();
        table.add_row(vec![
            Cell::new(info.code),
            Cell::new(info.label),
            Cell::new(info.flag),
            Cell::new(info.speech_tag),
        ]);
    }

    println!("{table}");
    Ok(())
}
