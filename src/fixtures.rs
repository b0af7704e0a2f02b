//! Synthetic commission pages for tests.
//!
//! The builders reproduce the positional structure of the live site (outer
//! frame tables, the breadcrumb row, the nested summary tables) so the
//! built-in layouts are exercised exactly as they are used in a crawl.

use crate::models::{Level, Page};

pub const HOST: &str = "http://www.vybory.izbirkom.ru";

pub const REGION: &str = "Сахалинская область";
pub const AREA_COMMITTEE: &str = "Избирательная комиссия Сахалинской области";
pub const TERRITORY: &str = "Александровск-Сахалинская";

pub const RESULTS_LINK: &str =
    "Сводная таблица предварительных итогов голосования";
pub const TURNOUT_LINK: &str = "Предварительные сведения об участии избирателей в выборах";

/// A results table as it appears on the page.
///
/// `rows[r]`, `totals[r]` and `cells[r]` describe page row `r + 1`. Row 0
/// is the header row, so `cells[0]` is never rendered: the column names take
/// its place.
#[derive(Debug, Clone)]
pub struct ResultsTable {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    pub totals: Vec<String>,
    pub cells: Vec<Vec<String>>,
}

impl ResultsTable {
    /// Header row, 12 ballot statistics, a blank separator and 3 candidates,
    /// over 3 territories.
    pub fn sample() -> Self {
        Self::build(
            12,
            &[
                "Бабурин Сергей Николаевич",
                "Грудинин Павел Николаевич",
                "Явлинский Григорий Алексеевич",
            ],
        )
    }

    /// The 2016 State Duma ballot: 18 statistics, a blank separator at row
    /// 19 and 4 parties.
    pub fn duma() -> Self {
        Self::build(
            18,
            &[
                "Единая Россия",
                "КПРФ",
                "ЛДПР",
                "Справедливая Россия",
            ],
        )
    }

    fn build(stats: usize, candidates: &[&str]) -> Self {
        let mut rows = vec!["Наименование показателя".to_string()];
        rows.extend((1..=stats).map(|i| format!("Число избирательных бюллетеней, строка {i}")));
        rows.push(String::new());
        rows.extend(candidates.iter().map(|name| name.to_string()));
        let columns: Vec<String> = [TERRITORY, "Анивская", "Долинская"]
            .map(String::from)
            .to_vec();

        let mut totals: Vec<String> = (0..rows.len()).map(|r| (1000 + r).to_string()).collect();
        let mut cells: Vec<Vec<String>> = (0..rows.len())
            .map(|r| {
                (0..columns.len())
                    .map(|c| (r * 37 + c * 11 + 5).to_string())
                    .collect()
            })
            .collect();
        totals[1] = "342734".to_string();
        cells[1][0] = "9051".to_string();
        cells[1][1] = "12021".to_string();

        Self {
            rows,
            columns,
            totals,
            cells,
        }
    }

    pub fn cell_value(&self, row: usize, col: usize) -> f64 {
        self.cells[row][col].parse().unwrap()
    }
}

/// A turnout table as it appears on the page.
///
/// `values[0]` is the "ВСЕГО" row; `values[i + 1]` belongs to `names[i]`.
#[derive(Debug, Clone)]
pub struct TurnoutTable {
    pub names: Vec<String>,
    pub values: Vec<Vec<String>>,
}

impl TurnoutTable {
    pub fn sample() -> Self {
        let names: Vec<String> = [TERRITORY, "Анивская", "Долинская"]
            .map(String::from)
            .to_vec();
        let values = [
            ["11.52%", "26.31%", "47.80%", "58.02%"],
            ["9.57%", "27.70%", "45.12%", "55.43%"],
            ["10.04%", "25.20%", "44.18%", "49.71%"],
            ["12.33%", "28.90%", "53.39%", "49.95%"],
        ]
        .iter()
        .map(|row| row.iter().map(|v| v.to_string()).collect())
        .collect();
        Self { names, values }
    }
}

/// `html` encoded as windows-1251, the way the site serves it.
pub fn cp1251(html: &str) -> Vec<u8> {
    encoding_rs::WINDOWS_1251.encode(html).0.into_owned()
}

/// `html` with a `<meta>` charset declaration at the top of the document.
pub fn declare_charset(html: &str, charset: &str) -> String {
    html.replacen(
        "<html>",
        &format!("<html><meta http-equiv=\"Content-Type\" content=\"text/html; charset={charset}\">"),
        1,
    )
}

/// Absolute URL on the test host.
pub fn url(path: &str) -> String {
    format!("{HOST}{path}")
}

/// Surround `content` with the outer frame of a page at `level`.
///
/// `second_row` fills the frame's second row, where intermediate pages keep
/// their drill-down link.
fn frame(level: Level, second_row: &str, content: &str) -> String {
    let (leading, crumbs) = match level {
        Level::Region => (1, ["ЦИК России", REGION, AREA_COMMITTEE]),
        Level::Station => (2, [REGION, AREA_COMMITTEE, TERRITORY]),
    };
    let leading_tables = "<table><tr><td>Выборы Президента Российской Федерации</td></tr></table>"
        .repeat(leading);
    let breadcrumb = crumbs
        .iter()
        .enumerate()
        .map(|(i, name)| format!("<a href=\"/crumb/{i}\">{name}</a>"))
        .collect::<Vec<_>>()
        .join(" &gt; ");
    format!(
        "<html><head><title>ЦИК</title></head><body>{leading_tables}<table>\
         <tr><td>{breadcrumb}</td></tr>\
         <tr><td>{second_row}</td></tr>\
         <tr><td>Дата голосования: 18.03.2018</td></tr>\
         <tr><td>{content}</td></tr>\
         </table></body></html>"
    )
}

fn filler_tables(count: usize) -> String {
    (1..=count)
        .map(|i| format!("<table><tr><td>Служебная таблица {i}</td></tr></table>"))
        .collect()
}

/// HTML of a results page. Column headers link to `/tik/{i}`.
pub fn results_html(level: Level, table: &ResultsTable) -> String {
    let left: String = table
        .rows
        .iter()
        .zip(&table.totals)
        .enumerate()
        .map(|(r, (label, total))| {
            format!("<tr><td>{r}</td><td>{label}</td><td><nobr><b>{total}</b></nobr></td></tr>")
        })
        .collect();

    let header: String = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| format!("<td><nobr><a href=\"/tik/{i}\">{name}</a></nobr></td>"))
        .collect();
    let body: String = table
        .cells
        .iter()
        .skip(1)
        .map(|row| {
            let tds: String = row
                .iter()
                .map(|value| format!("<td><nobr><b>{value}</b></nobr></td>"))
                .collect();
            format!("<tr>{tds}</tr>")
        })
        .collect();

    let content = format!(
        "{}<table><tr>\
         <td><table>{left}</table></td>\
         <td><div><table><tr>{header}</tr>{body}</table></div></td>\
         </tr></table>",
        filler_tables(5)
    );
    frame(level, "Итоги голосования", &content)
}

pub fn results_page(level: Level, table: &ResultsTable) -> Page {
    Page::new(url("/results"), results_html(level, table))
}

/// HTML of a turnout page. Commission names link to `/turnout/{i}`.
pub fn turnout_html(level: Level, table: &TurnoutTable) -> String {
    let mut rows = String::from(
        "<tr><td>№</td><td>Наименование ИК</td><td colspan=\"4\">Явка</td></tr>\
         <tr><td></td><td>10.00</td><td>10:00</td><td>12:00</td><td>15:00</td><td>18:00</td></tr>",
    );
    for (i, values) in table.values.iter().enumerate() {
        let label = match i {
            0 => "ВСЕГО, в том числе".to_string(),
            _ => format!("<a href=\"/turnout/{}\">{}</a>", i - 1, table.names[i - 1]),
        };
        let tds: String = values.iter().map(|v| format!("<td>{v}</td>")).collect();
        rows.push_str(&format!("<tr><td>{i}</td><td>{label}</td>{tds}</tr>"));
    }
    let content = format!("{}<table>{rows}</table>", filler_tables(3));
    frame(level, "Явка избирателей", &content)
}

pub fn turnout_page(level: Level, table: &TurnoutTable) -> Page {
    Page::new(url("/turnout"), turnout_html(level, table))
}

/// HTML of an intermediate territory page, optionally linking to `href`.
pub fn intermediate_html(href: Option<&str>) -> String {
    let second_row = match href {
        Some(href) => format!(
            "Для просмотра данных по участковым избирательным комиссиям перейдите \
             на <a href=\"{href}\">сайт избирательной комиссии субъекта</a>"
        ),
        None => "Данные по участковым комиссиям отсутствуют".to_string(),
    };
    frame(Level::Region, &second_row, &filler_tables(2))
}

pub fn intermediate_page(href: Option<&str>) -> Page {
    Page::new(url("/tik"), intermediate_html(href))
}

/// HTML of the central page with one region option per value.
pub fn root_html(values: &[&str]) -> String {
    let options: String = values
        .iter()
        .enumerate()
        .map(|(i, value)| format!("<option value=\"{value}\">Регион {i}</option>"))
        .collect();
    format!(
        "<html><body><form><select name=\"gs\">{options}</select></form></body></html>"
    )
}

pub fn root_page(values: &[&str]) -> Page {
    Page::new(url("/"), root_html(values))
}

/// HTML of a region home page with the given (text, href) links.
pub fn region_home_html(links: &[(&str, &str)]) -> String {
    let anchors: String = links
        .iter()
        .map(|(text, href)| format!("<p><a href=\"{href}\">{text}</a></p>"))
        .collect();
    format!(
        "<html><body><a href=\"/\">На главную</a>{anchors}<a href=\"/help\">Справка</a></body></html>"
    )
}

pub fn region_home_page(links: &[(&str, &str)]) -> Page {
    Page::new(url("/region"), region_home_html(links))
}
