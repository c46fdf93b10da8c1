//! Pieces tables.
//!
//! Three heuristics run as a prioritized pipeline: horizontal header rows,
//! then stacked (vertical) headers for tables where the horizontal pass
//! found nothing, then installation tables when neither found anything in
//! the whole document.

use crate::catalog::{file_extension, is_known_extension, is_known_repo, piece_type_for_extension};
use crate::model::{PiezasGrupo, PiezasItem, TextRow, TextTable};
use crate::normalize::pieces::merge_groups;
use crate::normalize::status::{guess_status, normalize_status};
use crate::normalize::text::{collapse_ws, fold_group_key};
use crate::options::ExtractOptions;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tracing::debug;

static NOMBRE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(^|\s)nombre(\s|$)").unwrap());
static STACKED_STATUS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)nuevo\s*o\s*modificado").unwrap());
static LISTING_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^listado de piezas detalladas").unwrap());
static CATEGORY_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}\p{N} _-]+(\s*/\s*[\p{L}\p{N} _-]+)+$").unwrap());
static UPPER_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z0-9 _-]{2,}$").unwrap());
static FILENAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._\-\\/]+\.([A-Za-z0-9]{1,8})").unwrap());
static INSTALL_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(objeto\s+a\s+instalar|objeto\s+a\s+respaldar|archivo|artefacto)").unwrap()
});
static REPO_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)repositorio\s*:?\s*$").unwrap());
static REPO_TRIPLE_KIND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(implementaci[óo]n|base de datos|par[áa]metros|seguridad|oic|salesforce)")
        .unwrap()
});
static NOT_APPLICABLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^N/?A$").unwrap());

/// Column positions of a horizontal pieces header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderMap {
    pub nombre: usize,
    pub tipo: usize,
    pub estado: usize,
}

/// Map a row to pieces columns, if it is a horizontal header.
///
/// The status column is matched loosely: its label wraps and varies.
pub fn horizontal_header(row: &TextRow) -> Option<HeaderMap> {
    let mut nombre = None;
    let mut tipo = None;
    let mut estado = None;
    for (i, cell) in row.iter().enumerate() {
        let key = collapse_ws(cell).to_lowercase();
        if nombre.is_none() && NOMBRE.is_match(&key) {
            nombre = Some(i);
        } else if tipo.is_none() && key == "tipo" {
            tipo = Some(i);
        } else if estado.is_none() && (key.contains("nuevo") || key.contains("modificado")) {
            estado = Some(i);
        }
    }
    Some(HeaderMap {
        nombre: nombre?,
        tipo: tipo?,
        estado: estado?,
    })
}

fn non_empty(row: &TextRow) -> Vec<&str> {
    row.iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect()
}

fn is_blank_row(row: &TextRow) -> bool {
    row.iter().all(|c| c.trim().is_empty())
}

/// Short, colon-free text that can name a group.
pub fn is_group_title(text: &str, max_len: usize) -> bool {
    let text = text.trim();
    !text.is_empty() && text.chars().count() <= max_len && !text.contains(':')
}

/// A row that opens a new group inside a pieces block.
fn is_group_title_row(row: &TextRow, opts: &ExtractOptions) -> bool {
    let cells = non_empty(row);
    if cells.len() != 1 {
        return false;
    }
    let text = cells[0];
    let single_cell = row.len() == 1 && is_group_title(text, opts.max_group_title_len);
    let category = CATEGORY_PATH.is_match(text) && text.chars().count() <= opts.max_group_title_len;
    single_cell || category
}

/// Group title above a header row, or the default name.
pub fn group_title_before(table: &TextTable, header: usize, opts: &ExtractOptions) -> String {
    let first = header.saturating_sub(opts.group_lookback_rows);
    for row in table[first..header].iter().rev() {
        let cells = non_empty(row);
        if cells.is_empty() || LISTING_TITLE.is_match(&cells.join(" ")) {
            continue;
        }
        if cells.len() == 1 && is_group_title(cells[0], opts.max_group_title_len) {
            return collapse_ws(cells[0]);
        }
    }
    opts.default_group_name.clone()
}

/// Horizontal blocks of a table; several may share one table.
pub fn detect_horizontal(table: &TextTable, opts: &ExtractOptions) -> Vec<PiezasGrupo> {
    let mut groups = Vec::new();
    for (h, header_row) in table.iter().enumerate() {
        let Some(map) = horizontal_header(header_row) else {
            continue;
        };
        let grupo = group_title_before(table, h, opts);
        let mut items = Vec::new();

        for row in &table[h + 1..] {
            if horizontal_header(row).is_some()
                || is_blank_row(row)
                || is_group_title_row(row, opts)
            {
                break;
            }
            let cell = |i: usize| row.get(i).map(|c| collapse_ws(c)).unwrap_or_default();
            let item = PiezasItem::new(cell(map.nombre), cell(map.tipo), normalize_status(&cell(map.estado)));
            if !item.is_blank() {
                items.push(item);
            }
        }

        if !items.is_empty() {
            debug!(grupo = %grupo, items = items.len(), "horizontal pieces block");
            groups.push(PiezasGrupo::with_items(grupo, items));
        }
    }
    groups
}

fn is_stacked_header(nombre: &str, tipo: &str, estado: &str) -> bool {
    nombre.eq_ignore_ascii_case("nombre")
        && tipo.eq_ignore_ascii_case("tipo")
        && STACKED_STATUS.is_match(estado)
}

fn is_header_token(text: &str) -> bool {
    text.eq_ignore_ascii_case("nombre")
        || text.eq_ignore_ascii_case("tipo")
        || STACKED_STATUS.is_match(text)
}

/// Upper-case token or known repository that can name a stacked group.
pub fn is_probable_group_name(text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() || is_header_token(text) || LISTING_TITLE.is_match(text) {
        return false;
    }
    UPPER_TOKEN.is_match(text) || is_known_repo(text)
}

/// Stacked blocks: Nombre / Tipo / Nuevo o Modificado in one column.
pub fn detect_vertical(table: &TextTable, opts: &ExtractOptions) -> Vec<PiezasGrupo> {
    let col0: Vec<String> = table
        .iter()
        .map(|row| non_empty(row).first().map(|c| collapse_ws(c)).unwrap_or_default())
        .collect();

    let mut groups = Vec::new();
    let mut i = 0;
    while i + 2 < col0.len() {
        if !is_stacked_header(&col0[i], &col0[i + 1], &col0[i + 2]) {
            i += 1;
            continue;
        }

        let first = i.saturating_sub(opts.vertical_lookback_rows);
        let grupo = col0[first..i]
            .iter()
            .rev()
            .find(|c| is_probable_group_name(c))
            .cloned()
            .unwrap_or_else(|| opts.default_group_name.clone());

        let mut items = Vec::new();
        let mut j = i + 3;
        while j + 2 < col0.len() {
            let (nombre, tipo, estado) = (&col0[j], &col0[j + 1], &col0[j + 2]);
            if is_stacked_header(nombre, tipo, estado) {
                break;
            }
            if nombre.is_empty() && tipo.is_empty() && estado.is_empty() {
                break;
            }
            if is_probable_group_name(nombre) && tipo.is_empty() && estado.is_empty() {
                break;
            }
            items.push(PiezasItem::new(nombre.clone(), tipo.clone(), normalize_status(estado)));
            j += 3;
        }

        if !items.is_empty() {
            debug!(grupo = %grupo, items = items.len(), "vertical pieces block");
            groups.push(PiezasGrupo::with_items(grupo, items));
        }
        i = j.max(i + 1);
    }
    groups
}

/// File names with a known extension in a text, basenames only, deduplicated.
///
/// ```
/// use manualdoc::extract::pieces::extract_filenames;
///
/// let names = extract_filenames(r"Copiar deploy/app.jar y C:\sql\ALTER_T.sql (ver notas.txt)");
/// assert_eq!(names, vec!["app.jar", "ALTER_T.sql"]);
/// ```
pub fn extract_filenames(text: &str) -> Vec<String> {
    let text = collapse_ws(text);
    let mut out: Vec<String> = Vec::new();
    for caps in FILENAME.captures_iter(&text) {
        if !is_known_extension(&caps[1]) {
            continue;
        }
        let full = &caps[0];
        let base = full.rsplit(['/', '\\']).next().unwrap_or(full);
        if base.is_empty() || NOT_APPLICABLE.is_match(base) {
            continue;
        }
        if !out.iter().any(|b| b == base) {
            out.push(base.to_string());
        }
    }
    out
}

/// Repository named by an installation table.
///
/// The cell below "Repositorio:", else a `[kind, branch, REPO]` row.
pub fn repository_name(table: &TextTable) -> Option<String> {
    let below_label = table.iter().enumerate().find_map(|(r, row)| {
        let c = row.iter().position(|cell| REPO_LABEL.is_match(cell.trim()))?;
        table
            .get(r + 1)
            .and_then(|next| next.get(c))
            .map(|v| collapse_ws(v))
            .filter(|v| !v.is_empty())
    });
    below_label.or_else(|| {
        table.iter().find_map(|row| {
            if row.len() >= 3 && REPO_TRIPLE_KIND.is_match(row[0].trim()) && is_known_repo(&row[2]) {
                Some(collapse_ws(&row[2]))
            } else {
                None
            }
        })
    })
}

/// Column of the "Objeto a instalar" header in the first rows.
fn install_column(table: &TextTable) -> Option<(usize, usize)> {
    table.iter().take(4).enumerate().find_map(|(r, row)| {
        row.iter()
            .position(|c| INSTALL_HEADER.is_match(&collapse_ws(c)))
            .map(|c| (r, c))
    })
}

/// Pieces of one installation table, if it is one.
pub fn installation_items(table: &TextTable, opts: &ExtractOptions) -> Option<Vec<PiezasItem>> {
    let (header_row, column) = install_column(table)?;
    let mut items = Vec::new();

    for row in &table[header_row + 1..] {
        let mut files = row.get(column).map(|c| extract_filenames(c)).unwrap_or_default();
        if files.is_empty() {
            for (c, cell) in row.iter().enumerate() {
                if c == column {
                    continue;
                }
                for f in extract_filenames(cell) {
                    if !files.contains(&f) {
                        files.push(f);
                    }
                }
            }
        }
        if files.is_empty() {
            continue;
        }

        let estado = guess_status(row, &opts.default_install_status);
        for file in files {
            let tipo = file_extension(&file)
                .map(|e| piece_type_for_extension(&e))
                .unwrap_or_default();
            items.push(PiezasItem::new(file, tipo, estado.clone()));
        }
    }
    Some(items)
}

/// Installation-table fallback over the whole document.
///
/// A repository seen again extends its existing group.
pub fn detect_installation(tables: &[TextTable], opts: &ExtractOptions) -> Vec<PiezasGrupo> {
    let mut groups: Vec<PiezasGrupo> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();

    for table in tables {
        let Some(items) = installation_items(table, opts) else {
            continue;
        };
        if items.is_empty() {
            continue;
        }
        let grupo = repository_name(table).unwrap_or_else(|| opts.default_group_name.clone());
        debug!(grupo = %grupo, items = items.len(), "installation table");

        let key = fold_group_key(&grupo);
        match by_name.get(&key) {
            Some(&i) => groups[i].items.extend(items),
            None => {
                by_name.insert(key, groups.len());
                groups.push(PiezasGrupo::with_items(grupo, items));
            }
        }
    }
    groups
}

/// Run the pieces pipeline and merge the result.
pub fn extract_pieces(tables: &[TextTable], opts: &ExtractOptions) -> Vec<PiezasGrupo> {
    let mut groups = Vec::new();
    for table in tables.iter().filter(|t| !t.is_empty()) {
        let horizontal = detect_horizontal(table, opts);
        if horizontal.is_empty() {
            groups.extend(detect_vertical(table, opts));
        } else {
            groups.extend(horizontal);
        }
    }

    if groups.is_empty() {
        groups = detect_installation(tables, opts);
    }

    let merged = merge_groups(groups);
    debug!(groups = merged.len(), "pieces merged");
    merged
}
