//! Plain text renderer for a parse result.

use crate::model::{ManualExtract, PiezasGrupo, Section};
use unicode_width::UnicodeWidthStr;

/// Render the sections as "Label: value" lines and every pieces group as an
/// ASCII table.
pub fn to_text(extract: &ManualExtract) -> String {
    let mut output = String::new();

    for section in &extract.secciones_reconocidas {
        output.push_str(&render_section(section));
        output.push('\n');
    }

    for group in &extract.piezas_detalladas {
        output.push_str(&group.grupo);
        output.push('\n');
        output.push_str(&render_pieces_table(group));
        output.push_str("\n\n");
    }

    output.trim_end().to_string()
}

fn render_section(section: &Section) -> String {
    let mut output = String::new();
    output.push_str(&section.title);
    output.push('\n');
    for field in &section.fields {
        output.push_str(&format!("  {}: {}\n", field.label, field.value.as_text()));
    }
    output
}

fn width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

fn pad(text: &str, w: usize) -> String {
    format!("{}{}", text, " ".repeat(w.saturating_sub(width(text))))
}

fn border(widths: &[usize], fill: char) -> String {
    let mut line = String::from("+");
    for w in widths {
        line.push_str(&fill.to_string().repeat(w + 2));
        line.push('+');
    }
    line
}

fn row_line(cells: &[&str], widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (cell, w) in cells.iter().zip(widths) {
        line.push_str(&format!(" {} |", pad(cell, *w)));
    }
    line
}

/// Render one group as an ASCII table with a header separator.
fn render_pieces_table(group: &PiezasGrupo) -> String {
    let header = ["Nombre", "Tipo", "Estado"];
    let mut widths: Vec<usize> = header.iter().copied().map(width).collect();
    for item in &group.items {
        for (i, text) in [&item.nombre, &item.tipo, &item.estado].iter().enumerate() {
            widths[i] = widths[i].max(width(text));
        }
    }

    let mut lines = vec![border(&widths, '-'), row_line(&header, &widths), border(&widths, '=')];
    for item in &group.items {
        lines.push(row_line(
            &[item.nombre.as_str(), item.tipo.as_str(), item.estado.as_str()],
            &widths,
        ));
    }
    lines.push(border(&widths, '-'));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Field, PiezasItem};

    #[test]
    fn test_section_lines() {
        let mut section = Section::new("informacion-general", "Información general");
        section.fields.push(Field::text("id-cambio", "ID de Cambio", "CHG-1"));
        let extract = ManualExtract {
            secciones_reconocidas: vec![section],
            ..Default::default()
        };
        assert_eq!(to_text(&extract), "Información general\n  ID de Cambio: CHG-1");
    }

    #[test]
    fn test_pieces_table_alignment() {
        let group = PiezasGrupo::with_items(
            "OSB",
            vec![PiezasItem::new("año.xsd", "XSD", "Nuevo")],
        );
        let table = render_pieces_table(&group);
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines[1], "| Nombre  | Tipo | Estado |");
        assert_eq!(lines[3], "| año.xsd | XSD  | Nuevo  |");
        assert!(lines.iter().all(|l| l.chars().count() == lines[0].chars().count()));
    }
}
