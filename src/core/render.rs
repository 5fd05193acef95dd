//! Renderer module
//!
//! Renders a cart view to different output formats: jsonl, json, md, raw

use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

use crate::core::model::LineItem;
use crate::ledger::CartLedger;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jsonl,
    Json,
    Markdown,
    Raw,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jsonl" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            "raw" => Ok(OutputFormat::Raw),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            pretty: false,
        }
    }

    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// What gets rendered for a cart
#[derive(Debug, Clone, Serialize)]
pub struct CartView<'a> {
    pub items: &'a [LineItem],
    pub total: Decimal,
    pub item_count: u64,
    pub currency: &'a str,
}

impl<'a> CartView<'a> {
    pub fn new(ledger: &'a CartLedger, currency: &'a str) -> Self {
        Self {
            items: ledger.items(),
            total: ledger.total(),
            item_count: ledger.item_count(),
            currency,
        }
    }
}

/// One JSONL record
#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum Row<'a> {
    Item(&'a LineItem),
    Summary {
        total: Decimal,
        item_count: u64,
        lines: usize,
        currency: &'a str,
    },
}

/// Renderer for cart views
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            config: RenderConfig::new(format),
        }
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a cart view to a string
    pub fn render(&self, view: &CartView) -> String {
        match self.config.format {
            OutputFormat::Jsonl => self.render_jsonl(view),
            OutputFormat::Json => self.render_json(view),
            OutputFormat::Markdown => self.render_markdown(view),
            OutputFormat::Raw => self.render_raw(view),
        }
    }

    /// Render to a writer
    pub fn render_to<W: Write>(&self, view: &CartView, mut writer: W) -> std::io::Result<()> {
        let output = self.render(view);
        writeln!(writer, "{}", output)
    }

    fn to_json<T: Serialize>(&self, value: &T) -> Option<String> {
        if self.config.pretty {
            serde_json::to_string_pretty(value).ok()
        } else {
            serde_json::to_string(value).ok()
        }
    }

    /// One item per line, then a summary line
    fn render_jsonl(&self, view: &CartView) -> String {
        let summary = Row::Summary {
            total: view.total,
            item_count: view.item_count,
            lines: view.items.len(),
            currency: view.currency,
        };

        view.items
            .iter()
            .map(Row::Item)
            .chain(std::iter::once(summary))
            .filter_map(|row| self.to_json(&row))
            .collect::<Vec<_>>()
            .join(if self.config.pretty { "\n\n" } else { "\n" })
    }

    fn render_json(&self, view: &CartView) -> String {
        self.to_json(view).unwrap_or_else(|| "{}".to_string())
    }

    fn render_markdown(&self, view: &CartView) -> String {
        let mut output = String::from("## Cart\n\n");

        if view.items.is_empty() {
            output.push_str("_Cart is empty._\n\n");
        } else {
            output.push_str("| Item | Name | Qty | Price | Subtotal |\n");
            output.push_str("|---|---|---:|---:|---:|\n");
            for item in view.items {
                let name = item
                    .attributes
                    .get("name")
                    .and_then(|n| n.as_str())
                    .unwrap_or("");
                let subtotal = item
                    .subtotal()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "overflow".to_string());
                output.push_str(&format!(
                    "| `{}` | {} | {} | {} | {} |\n",
                    escape_cell(item.id.as_str()),
                    escape_cell(name),
                    item.quantity,
                    item.price,
                    subtotal
                ));
            }
            output.push('\n');
        }

        output.push_str(&format!(
            "**Total:** {} {} ({} items)\n",
            view.total, view.currency, view.item_count
        ));
        output
    }

    /// Tab-separated lines, unstable format
    fn render_raw(&self, view: &CartView) -> String {
        let mut lines: Vec<String> = view
            .items
            .iter()
            .map(|i| format!("{}\t{}\t{}", i.id, i.quantity, i.price))
            .collect();
        lines.push(format!("total\t{}\t{}", view.total, view.currency));
        lines.join("\n")
    }
}

/// Keep free text inside one Markdown table cell
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::CatalogItem;
    use serde_json::Value;

    fn sample() -> CartLedger {
        let mut ledger = CartLedger::new();
        ledger
            .add_item(CatalogItem::new("a", Decimal::from(10)).with_attribute("name", "Pho"))
            .unwrap();
        ledger
            .add_item(CatalogItem::new("b", Decimal::new(550, 2)))
            .unwrap();
        ledger.update_quantity("a", 2).unwrap();
        ledger
    }

    #[test]
    fn test_render_jsonl() {
        let ledger = sample();
        let output = Renderer::new(OutputFormat::Jsonl).render(&CartView::new(&ledger, "USD"));

        let rows: Vec<Value> = output
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["kind"], "item");
        assert_eq!(rows[0]["id"], "a");
        assert_eq!(rows[0]["name"], "Pho");
        assert_eq!(rows[2]["kind"], "summary");
        assert_eq!(rows[2]["total"], "25.50");
        assert_eq!(rows[2]["item_count"], 3);
        assert_eq!(rows[2]["lines"], 2);
    }

    #[test]
    fn test_render_jsonl_empty_cart_has_summary() {
        let ledger = CartLedger::new();
        let output = Renderer::new(OutputFormat::Jsonl).render(&CartView::new(&ledger, "USD"));
        assert_eq!(output.lines().count(), 1);
        assert!(output.contains("\"kind\":\"summary\""));
    }

    #[test]
    fn test_render_json() {
        let ledger = sample();
        let output = Renderer::new(OutputFormat::Json).render(&CartView::new(&ledger, "EUR"));
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["items"].as_array().unwrap().len(), 2);
        assert_eq!(value["currency"], "EUR");
        assert!(output.starts_with('{'));
    }

    #[test]
    fn test_render_markdown() {
        let ledger = sample();
        let output = Renderer::new(OutputFormat::Markdown).render(&CartView::new(&ledger, "USD"));
        assert!(output.contains("| `a` | Pho | 2 | 10 | 20 |"));
        assert!(output.contains("**Total:** 25.50 USD (3 items)"));
    }

    #[test]
    fn test_render_markdown_escapes_pipes() {
        let mut ledger = CartLedger::new();
        let item = CatalogItem::new("x|y", Decimal::from(3))
            .with_attribute("name", "Fish | Chips\nlarge");
        ledger.add_item(item).unwrap();
        let output = Renderer::new(OutputFormat::Markdown).render(&CartView::new(&ledger, "USD"));
        assert!(output.contains("| `x\\|y` | Fish \\| Chips large | 1 | 3 | 3 |\n"));
    }

    #[test]
    fn test_render_markdown_empty() {
        let ledger = CartLedger::new();
        let output = Renderer::new(OutputFormat::Markdown).render(&CartView::new(&ledger, "USD"));
        assert!(output.contains("Cart is empty"));
    }

    #[test]
    fn test_render_raw() {
        let ledger = sample();
        let output = Renderer::new(OutputFormat::Raw).render(&CartView::new(&ledger, "USD"));
        assert_eq!(output, "a\t2\t10\nb\t1\t5.50\ntotal\t25.50\tUSD");
    }

    #[test]
    fn test_render_json_pretty() {
        let ledger = sample();
        let config = RenderConfig::with_pretty(OutputFormat::Json, true);
        let output = Renderer::with_config(config).render(&CartView::new(&ledger, "USD"));
        assert!(output.contains("\n  \"items\""));
    }

    #[test]
    fn test_render_to_writer() {
        let ledger = CartLedger::new();
        let mut buf = Vec::new();
        Renderer::new(OutputFormat::Raw)
            .render_to(&CartView::new(&ledger, "USD"), &mut buf)
            .unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "total\t0\tUSD\n");
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("jsonl".parse::<OutputFormat>().unwrap(), OutputFormat::Jsonl);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(
            "markdown".parse::<OutputFormat>().unwrap(),
            OutputFormat::Markdown
        );
        assert_eq!("raw".parse::<OutputFormat>().unwrap(), OutputFormat::Raw);
    }

    #[test]
    fn test_output_format_parse_invalid() {
        let result = "invalid".parse::<OutputFormat>();
        assert!(result.unwrap_err().contains("Unknown format"));
    }

    #[test]
    fn test_render_config_default() {
        let config = RenderConfig::default();
        assert_eq!(config.format, OutputFormat::Jsonl);
        assert!(!config.pretty);
    }
}
