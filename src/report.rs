//! HTML rendering of dashboard pages

use std::fmt::{self, Write as _};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::DashboardError;
use crate::view::{NavMode, Page, SelectBox, Table, Widget};

/// Width of the header image slot, in pixels
pub const IMAGE_WIDTH: u32 = 150;

const STYLE: &str = r#"
*{box-sizing:border-box}
body{margin:0;font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',sans-serif;color:#262730;display:flex;min-height:100vh}
#sidebar{width:260px;flex-shrink:0;background:#f0f2f6;padding:24px 18px}
#sidebar h2{font-size:18px;margin:0 0 16px}
#sidebar .nav a{display:block;padding:6px 10px;border-radius:6px;color:#262730;text-decoration:none}
#sidebar .nav a.active{background:#ff4b4b;color:#fff}
#sidebar label{display:block;font-size:13px;margin:18px 0 4px}
#sidebar select{width:100%;padding:5px}
#sidebar .footer{margin-top:24px;border-top:1px solid #ccc;padding-top:12px;font-size:12px;color:#6a6a8a}
#main{flex:1;padding:24px 48px;overflow-x:hidden}
.title{display:flex;align-items:center;justify-content:space-between}
.columns{display:flex;gap:24px}
.column{flex:1;min-width:0}
.table-wrap{max-height:420px;overflow:auto;margin:8px 0 16px}
table{border-collapse:collapse;font-size:13px}
th,td{border:1px solid #e6e9ef;padding:4px 8px;text-align:right;white-space:nowrap}
th{background:#f7f8fa}
figure{margin:12px 0 24px}
figure svg{max-width:100%;height:auto}
"#;

/// Fixed inputs of the page template
#[derive(Debug, Clone)]
pub struct PageAssets {
    /// Image file name, relative to the page
    pub image: String,
    pub generated_at: DateTime<Utc>,
}

/// Fail unless the header image exists
pub fn ensure_image(path: &Path) -> Result<(), DashboardError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(DashboardError::MissingImage(path.to_path_buf()))
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn render_table(out: &mut String, table: &Table) -> fmt::Result {
    out.push_str("<div class=\"table-wrap\"><table>");
    if !table.columns.is_empty() {
        out.push_str("<thead><tr>");
        for column in &table.columns {
            write!(out, "<th>{}</th>", escape_html(column))?;
        }
        out.push_str("</tr></thead>");
    }
    out.push_str("<tbody>");
    for row in &table.rows {
        out.push_str("<tr>");
        for cell in row {
            write!(out, "<td>{}</td>", escape_html(cell))?;
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table></div>\n");
    Ok(())
}

fn render_widgets(out: &mut String, widgets: &[Widget]) -> crate::Result<()> {
    for widget in widgets {
        match widget {
            Widget::Header(text) => {
                writeln!(out, "<h2>{}</h2>", escape_html(text))?;
            }
            Widget::Subheader(text) => {
                writeln!(out, "<h3>{}</h3>", escape_html(text))?;
            }
            Widget::Text(text) => {
                writeln!(out, "<p>{}</p>", escape_html(text))?;
            }
            Widget::Strong(text) => {
                writeln!(out, "<p><strong>{}</strong></p>", escape_html(text))?;
            }
            Widget::List(items) => {
                out.push_str("<ol>");
                for item in items {
                    write!(out, "<li>{}</li>", escape_html(item))?;
                }
                out.push_str("</ol>\n");
            }
            Widget::Table(table) => render_table(out, table)?,
            Widget::Columns(columns) => {
                out.push_str("<div class=\"columns\">");
                for column in columns {
                    out.push_str("<div class=\"column\">");
                    render_widgets(out, column)?;
                    out.push_str("</div>");
                }
                out.push_str("</div>\n");
            }
            Widget::Chart(chart) => {
                let svg = chart
                    .to_svg()
                    .with_context(|| format!("rendering chart '{}'", chart.title()))?;
                writeln!(out, "<figure>{svg}</figure>")?;
            }
        }
    }
    Ok(())
}

fn render_control(out: &mut String, control: &SelectBox) -> fmt::Result {
    write!(out, "<label>{}</label><select>", escape_html(&control.label))?;
    for option in &control.options {
        let selected = if *option == control.selected { " selected" } else { "" };
        write!(
            out,
            "<option{selected}>{}</option>",
            escape_html(option)
        )?;
    }
    if !control.options.contains(&control.selected) {
        write!(
            out,
            "<option selected>{}</option>",
            escape_html(&control.selected)
        )?;
    }
    out.push_str("</select>\n");
    Ok(())
}

fn render_sidebar(out: &mut String, page: &Page, assets: &PageAssets) -> fmt::Result {
    out.push_str("<aside id=\"sidebar\"><h2>Navigation</h2><div class=\"nav\">\n");
    for mode in NavMode::ALL {
        let class = if mode == page.mode { " class=\"active\"" } else { "" };
        writeln!(
            out,
            "<a href=\"{}.html\"{class}>{}</a>",
            mode.slug(),
            escape_html(mode.label())
        )?;
    }
    out.push_str("</div>\n");

    for control in &page.controls {
        render_control(out, control)?;
    }

    write!(
        out,
        "<div class=\"footer\">Generated {}<br>End of App</div></aside>\n",
        assets.generated_at.format("%Y-%m-%d %H:%M UTC")
    )
}

/// Render a page to a complete HTML document
///
/// # Arguments
/// * `page` - Evaluated view; charts are rendered to inline SVG here
/// * `assets` - Image name and footer timestamp
///
/// # Returns
/// * The document, or the first chart or formatting error
pub fn render_html(page: &Page, assets: &PageAssets) -> crate::Result<String> {
    let mut out = String::new();
    write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{} - {}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n",
        escape_html(&page.title),
        escape_html(page.mode.label())
    )?;

    render_sidebar(&mut out, page, assets)?;

    write!(
        out,
        "<main id=\"main\"><div class=\"title\"><h1>{}</h1>\
         <img src=\"{}\" width=\"{IMAGE_WIDTH}\" alt=\"\"></div>\n",
        escape_html(&page.title),
        escape_html(&assets.image)
    )?;
    render_widgets(&mut out, &page.widgets)?;
    out.push_str("</main>\n</body>\n</html>\n");
    Ok(out)
}

/// Write `page` as `<mode>.html` into `output_dir` next to a copy of the header image
///
/// # Arguments
/// * `page` - Evaluated view
/// * `output_dir` - Created when missing
/// * `image` - Header image; copied next to the page unless already there
/// * `generated_at` - Timestamp shown in the sidebar footer
///
/// # Returns
/// * Path of the written page
pub fn write_page(
    page: &Page,
    output_dir: &Path,
    image: &Path,
    generated_at: DateTime<Utc>,
) -> crate::Result<PathBuf> {
    ensure_image(image)?;
    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;

    let image_name = image
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| DashboardError::MissingImage(image.to_path_buf()))?;
    let image_target = output_dir.join(&image_name);
    if image_target != image {
        fs::copy(image, &image_target)
            .with_context(|| format!("copying image to {}", image_target.display()))?;
        debug!(path = %image_target.display(), "copied header image");
    }

    let assets = PageAssets {
        image: image_name,
        generated_at,
    };
    let html = render_html(page, &assets)?;
    let page_path = output_dir.join(format!("{}.html", page.mode.slug()));
    fs::write(&page_path, html)
        .with_context(|| format!("writing page {}", page_path.display()))?;

    info!(path = %page_path.display(), mode = page.mode.label(), "page written");
    Ok(page_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viz::{Chart, DonutChart};
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn assets() -> PageAssets {
        PageAssets {
            image: "card.png".to_string(),
            generated_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    fn sample_page() -> Page {
        Page {
            title: "Credit Card Analysis".to_string(),
            mode: NavMode::Visualizations,
            controls: vec![SelectBox {
                label: "Select Gender :".to_string(),
                options: vec!["M".to_string(), "F".to_string()],
                selected: "F".to_string(),
            }],
            widgets: vec![
                Widget::Header("Interactive <Visualizations>".to_string()),
                Widget::Table(Table {
                    columns: vec!["Gender".to_string()],
                    rows: vec![vec!["F".to_string()]],
                }),
                Widget::Chart(Chart::Donut(DonutChart {
                    title: "Combined".to_string(),
                    slices: Vec::new(),
                    hole: 0.4,
                })),
            ],
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b & 'c'"), "a&lt;b &amp; &#39;c&#39;");
    }

    #[test]
    fn test_render_html_structure() {
        let html = render_html(&sample_page(), &assets()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(
            "<a href=\"visualizations.html\" class=\"active\">Visualizations</a>"
        ));
        assert!(html.contains("<a href=\"overview.html\">Data Overview</a>"));
        assert!(html.contains("<option selected>F</option>"));
        assert!(html.contains("Interactive &lt;Visualizations&gt;"));
        assert!(html.contains("<img src=\"card.png\" width=\"150\""));
        assert!(html.contains("Generated 2024-05-01 12:00 UTC"));
        assert!(html.contains("<svg"));
    }

    #[test]
    fn test_render_table_escapes_cells() {
        let mut out = String::new();
        render_table(
            &mut out,
            &Table {
                columns: vec!["Card_Category".to_string()],
                rows: vec![vec!["<Blue> & Gold".to_string()], vec![String::new()]],
            },
        )
        .unwrap();
        assert!(out.contains("<th>Card_Category</th>"));
        assert!(out.contains("<td>&lt;Blue&gt; &amp; Gold</td>"));
        assert_eq!(out.matches("<tr>").count(), 3);
    }

    #[test]
    fn test_render_html_is_deterministic() {
        let page = sample_page();
        assert_eq!(
            render_html(&page, &assets()).unwrap(),
            render_html(&page, &assets()).unwrap()
        );
    }

    #[test]
    fn test_write_page_copies_image() {
        let dir = tempdir().unwrap();
        let image = dir.path().join("card.png");
        fs::write(&image, b"\x89PNG").unwrap();
        let output = dir.path().join("out");

        let path = write_page(&sample_page(), &output, &image, assets().generated_at).unwrap();
        assert_eq!(path, output.join("visualizations.html"));
        assert!(output.join("card.png").exists());
    }

    #[test]
    fn test_write_page_requires_image() {
        let dir = tempdir().unwrap();
        let err = write_page(
            &sample_page(),
            dir.path(),
            &dir.path().join("missing.png"),
            assets().generated_at,
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DashboardError>(),
            Some(DashboardError::MissingImage(_))
        ));
    }
}
