//! Receipt → operation sequence.

use super::{LineItem, Receipt};
use crate::ir::{Align, Column, PrintOperation};

/// Map a receipt onto print operations.
///
/// Layout, top to bottom:
///
/// ```text
/// [logo]
///           HEADER LINE 1        centered, bold
///           HEADER LINE 2
///                                blank line
/// Widget                      2x         5.00
/// ------------------------------------------   only when items exist
///                              TOTAL: 10.00    right, bold
///            footer line 1       centered
/// <cut>
/// ```
///
/// Absent or blank fields add nothing; the trailing cut is always present.
pub fn compose(receipt: &Receipt) -> Vec<PrintOperation> {
    let mut ops = Vec::new();

    if let Some(logo) = receipt.logo.as_ref().filter(|l| !l.is_empty()) {
        ops.push(PrintOperation::Image(logo.clone()));
    }

    let header = printable_lines(&receipt.header);
    if !header.is_empty() {
        ops.push(PrintOperation::SetAlign(Align::Center));
        ops.push(PrintOperation::SetEmphasis(true));
        ops.extend(header.into_iter().map(PrintOperation::Text));
        ops.push(PrintOperation::SetEmphasis(false));
        ops.push(PrintOperation::FeedLine);
    }

    ops.push(PrintOperation::SetAlign(Align::Left));
    ops.extend(receipt.items.iter().map(item_row));
    if !receipt.items.is_empty() {
        ops.push(PrintOperation::Rule);
    }

    if let Some(total) = receipt.total {
        ops.push(PrintOperation::SetAlign(Align::Right));
        ops.push(PrintOperation::SetEmphasis(true));
        ops.push(PrintOperation::Text(format!("TOTAL: {}", total)));
        ops.push(PrintOperation::SetEmphasis(false));
    }

    let footer = printable_lines(&receipt.footer);
    if !footer.is_empty() {
        ops.push(PrintOperation::SetAlign(Align::Center));
        ops.extend(footer.into_iter().map(PrintOperation::Text));
    }

    ops.push(PrintOperation::Cut);
    ops
}

/// Short page printed by a connection test.
pub fn test_page() -> Vec<PrintOperation> {
    vec![
        PrintOperation::SetAlign(Align::Center),
        PrintOperation::Text("Thermal Printer Test".to_string()),
        PrintOperation::FeedLine,
        PrintOperation::Cut,
    ]
}

fn item_row(item: &LineItem) -> PrintOperation {
    PrintOperation::TableRow(vec![
        Column::left(item.name.clone(), 0.6),
        Column::right(format!("{}x", item.qty), 0.1),
        Column::right(item.price.to_string(), 0.3),
    ])
}

/// Lines of a multi-line field with leading and trailing blank lines removed.
/// Blank lines between text lines are kept.
fn printable_lines(field: &Option<String>) -> Vec<String> {
    let Some(text) = field.as_deref() else {
        return Vec::new();
    };
    let lines: Vec<&str> = text.lines().collect();
    let is_text = |line: &&str| !line.trim().is_empty();
    match (lines.iter().position(is_text), lines.iter().rposition(is_text)) {
        (Some(first), Some(last)) => lines[first..=last].iter().map(|l| l.to_string()).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipt::{ImageBuffer, Money};
    use pretty_assertions::assert_eq;

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    fn count(ops: &[PrintOperation], pred: impl Fn(&PrintOperation) -> bool) -> usize {
        ops.iter().filter(|op| pred(op)).count()
    }

    #[test]
    fn test_empty_receipt_is_align_and_cut() {
        let ops = compose(&Receipt::new());
        assert_eq!(
            ops,
            vec![PrintOperation::SetAlign(Align::Left), PrintOperation::Cut]
        );
    }

    #[test]
    fn test_empty_strings_add_nothing() {
        let receipt = Receipt::new().header("").footer("");
        assert_eq!(compose(&receipt), compose(&Receipt::new()));
    }

    #[test]
    fn test_blank_only_fields_add_nothing() {
        let receipt = Receipt::new().header("\n").footer("   \n\t");
        assert_eq!(compose(&receipt), compose(&Receipt::new()));
    }

    #[test]
    fn test_surrounding_blank_lines_are_dropped() {
        let ops = compose(&Receipt::new().footer("\nThanks\n\nBye\n  "));
        assert_eq!(
            ops,
            vec![
                PrintOperation::SetAlign(Align::Left),
                PrintOperation::SetAlign(Align::Center),
                PrintOperation::Text("Thanks".into()),
                PrintOperation::Text("".into()),
                PrintOperation::Text("Bye".into()),
                PrintOperation::Cut,
            ]
        );
    }

    #[test]
    fn test_full_receipt_protocol() {
        let receipt = Receipt::new()
            .logo(ImageBuffer::new(8, 1, vec![0xFF]).unwrap())
            .header("SHOP\nMain St")
            .item(LineItem::new("Widget", 2, money("5.00")).unwrap())
            .total(money("10"))
            .footer("Thanks\nCome again");

        let ops = compose(&receipt);
        assert_eq!(
            ops,
            vec![
                PrintOperation::Image(ImageBuffer::new(8, 1, vec![0xFF]).unwrap()),
                PrintOperation::SetAlign(Align::Center),
                PrintOperation::SetEmphasis(true),
                PrintOperation::Text("SHOP".into()),
                PrintOperation::Text("Main St".into()),
                PrintOperation::SetEmphasis(false),
                PrintOperation::FeedLine,
                PrintOperation::SetAlign(Align::Left),
                PrintOperation::TableRow(vec![
                    Column::left("Widget", 0.6),
                    Column::right("2x", 0.1),
                    Column::right("5.00", 0.3),
                ]),
                PrintOperation::Rule,
                PrintOperation::SetAlign(Align::Right),
                PrintOperation::SetEmphasis(true),
                PrintOperation::Text("TOTAL: 10.00".into()),
                PrintOperation::SetEmphasis(false),
                PrintOperation::SetAlign(Align::Center),
                PrintOperation::Text("Thanks".into()),
                PrintOperation::Text("Come again".into()),
                PrintOperation::Cut,
            ]
        );
    }

    #[test]
    fn test_rows_follow_item_order() {
        let names = ["first", "second", "third"];
        let receipt = Receipt::new().items(
            names
                .iter()
                .map(|n| LineItem::new(*n, 1, Money::ZERO).unwrap()),
        );
        let ops = compose(&receipt);

        let row_names: Vec<String> = ops
            .iter()
            .filter_map(|op| match op {
                PrintOperation::TableRow(cols) => Some(cols[0].text.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(row_names, names);
        assert_eq!(count(&ops, |op| matches!(op, PrintOperation::Rule)), 1);
    }

    #[test]
    fn test_no_items_means_no_rows_and_no_rule() {
        let ops = compose(&Receipt::new().header("H").total(money("1")));
        assert_eq!(count(&ops, |op| matches!(op, PrintOperation::TableRow(_))), 0);
        assert_eq!(count(&ops, |op| matches!(op, PrintOperation::Rule)), 0);
        assert_eq!(count(&ops, |op| matches!(op, PrintOperation::Cut)), 1);
        assert_eq!(ops.last(), Some(&PrintOperation::Cut));
    }

    #[test]
    fn test_price_formatting_happens_here() {
        let receipt = Receipt::new().item(LineItem::new("Tea", 1, money("2.5")).unwrap());
        let ops = compose(&receipt);
        let PrintOperation::TableRow(cols) = &ops[1] else {
            panic!("expected a table row, got {:?}", ops[1]);
        };
        assert_eq!(cols[2].text, "2.50");
        assert_eq!(cols[1].text, "1x");
    }

    #[test]
    fn test_compose_is_pure() {
        let receipt = Receipt::new()
            .header("A")
            .item(LineItem::new("x", 3, money("0.99")).unwrap());
        assert_eq!(compose(&receipt), compose(&receipt));
    }

    #[test]
    fn test_page_is_centered_and_cut() {
        let ops = test_page();
        assert_eq!(ops[0], PrintOperation::SetAlign(Align::Center));
        assert_eq!(ops[1], PrintOperation::Text("Thermal Printer Test".into()));
        assert_eq!(ops.last(), Some(&PrintOperation::Cut));
    }
}
