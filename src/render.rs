//! HTML fragments for the host page's table and button containers.

use crate::models::{FeedbackCollection, FeedbackRecord};

pub const PREDICT_SENTIMENT_LABEL: &str = "Predict Sentiment";
pub const IDENTIFY_GENDER_LABEL: &str = "Identify Gender";
pub const CHECKBOX_CLASS: &str = "selectedCb";

const TABLE_HEAD: &str = "<table><col width=2%><col width=20%><col width=60%><col width=9%><col width=9%>\
<tr><th></th><th>Name</th><th><center>Feedback</center></th><th>Sentiment</th><th>Gender</th></tr>";

/// Header row plus one row per record, in collection order.
pub fn render_table(collection: &FeedbackCollection) -> String {
    let mut table = String::from(TABLE_HEAD);
    for record in collection {
        table.push_str(&render_row(record));
    }
    table.push_str("</table>");
    table
}

/// Renders a raw list response body; anything that is not a list of records gives zero rows.
pub fn render_body(body: &str) -> String {
    render_table(&FeedbackCollection::from_body(body))
}

/// Control panel that goes into the button container.
pub fn render_controls() -> String {
    format!(
        "<button type=\"button\" data-action=\"predict-sentiment\">{}</button> \
<button type=\"button\" data-action=\"identify-gender\">{}</button> ",
        PREDICT_SENTIMENT_LABEL, IDENTIFY_GENDER_LABEL
    )
}

fn render_row(record: &FeedbackRecord) -> String {
    format!(
        "<tr><td><input type=\"checkbox\" class=\"{}\" name=\"predict\" value=\"{}\"></td>\
<td>{}</td><td><label>{}</label></td><td>{}</td><td>{}</td></tr>",
        CHECKBOX_CLASS,
        html_escape(record.id.as_str()),
        cell(&record.name),
        cell(&record.feedback),
        cell(&record.sentiment),
        cell(&record.gender),
    )
}

fn cell(value: &Option<String>) -> String {
    value.as_deref().map(html_escape).unwrap_or_default()
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_rows(html: &str) -> Vec<&str> {
        html.split("<tr>").skip(2).collect()
    }

    fn cells(row: &str) -> Vec<String> {
        row.split("<td>")
            .skip(1)
            .map(|cell| {
                cell.trim_end_matches("</tr></table>")
                    .trim_end_matches("</tr>")
                    .trim_end_matches("</td>")
                    .trim_start_matches("<label>")
                    .trim_end_matches("</label>")
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn test_empty_collection_has_header_only() {
        let html = render_table(&FeedbackCollection::empty());
        assert!(html.starts_with("<table>"));
        assert!(html.ends_with("</table>"));
        assert!(html.contains("<th>Name</th>"));
        assert!(html.contains("<th>Sentiment</th>"));
        assert!(html.contains("<th>Gender</th>"));
        assert_eq!(html.matches("<tr>").count(), 1);
        assert!(data_rows(&html).is_empty());
    }

    #[test]
    fn test_two_record_example() {
        let body = r#"[
            {"id":"1","Name":"A","Feedback":"x","Sentiment":null,"Gender":null},
            {"id":"2","Name":"B","Feedback":"y","Sentiment":"positive","Gender":"F"}
        ]"#;
        let html = render_body(body);
        let rows = data_rows(&html);
        assert_eq!(rows.len(), 2);

        let first = cells(rows[0]);
        assert!(first[0].contains("value=\"1\""));
        assert_eq!(first[1], "A");
        assert_eq!(first[2], "x");
        assert_eq!(first[3], "");
        assert_eq!(first[4], "");

        let second = cells(rows[1]);
        assert!(second[0].contains("value=\"2\""));
        assert_eq!(second[1], "B");
        assert_eq!(second[3], "positive");
        assert_eq!(second[4], "F");
    }

    #[test]
    fn test_absent_fields_never_render_null_or_undefined() {
        let optional = ["Feedback", "Sentiment", "Gender"];
        for mask in 0..(1u8 << optional.len()) {
            let mut object = serde_json::Map::new();
            object.insert("ID".into(), "r".into());
            object.insert("Name".into(), "N".into());
            for (bit, key) in optional.iter().enumerate() {
                if mask & (1 << bit) != 0 {
                    object.insert((*key).into(), serde_json::Value::Null);
                }
            }
            let body = serde_json::Value::Array(vec![object.into()]).to_string();
            let html = render_body(&body);

            assert_eq!(data_rows(&html).len(), 1, "mask {}", mask);
            assert!(!html.contains("null"), "mask {}: {}", mask, html);
            assert!(!html.contains("undefined"), "mask {}: {}", mask, html);
        }
    }

    #[test]
    fn test_wrongly_typed_fields_still_render_a_selectable_row() {
        let html = render_body(r#"[{"ID":"1","Name":"A","Gender":0.73},{"ID":"2","Name":"B","Feedback":["x"]}]"#);
        let rows = data_rows(&html);
        assert_eq!(rows.len(), 2);

        let first = cells(rows[0]);
        assert!(first[0].contains("value=\"1\""));
        assert_eq!(first[4], "0.73");

        let second = cells(rows[1]);
        assert!(second[0].contains("value=\"2\""));
        assert_eq!(second[1], "B");
        assert_eq!(second[2], "");
    }

    #[test]
    fn test_missing_name_renders_empty() {
        let html = render_body(r#"[{"ID":"9"}]"#);
        let row = cells(data_rows(&html)[0]);
        assert_eq!(row[1], "");
    }

    #[test]
    fn test_malformed_body_renders_zero_rows() {
        let html = render_body("not json");
        assert!(data_rows(&html).is_empty());
        assert!(html.ends_with("</table>"));
    }

    #[test]
    fn test_checkbox_is_tagged_with_record_id() {
        let html = render_body(r#"[{"ID":"abc-123","Name":"A"}]"#);
        assert!(html.contains(
            "<input type=\"checkbox\" class=\"selectedCb\" name=\"predict\" value=\"abc-123\">"
        ));
    }

    #[test]
    fn test_cell_text_is_escaped() {
        let html = render_body(
            r#"[{"ID":"\"><script>","Name":"<b>A</b>","Feedback":"fish & chips"}]"#,
        );
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<b>"));
        assert!(html.contains("value=\"&quot;&gt;&lt;script&gt;\""));
        assert!(html.contains("&lt;b&gt;A&lt;/b&gt;"));
        assert!(html.contains("fish &amp; chips"));
    }

    #[test]
    fn test_controls_offer_both_actions() {
        let controls = render_controls();
        assert!(controls.contains("Predict Sentiment"));
        assert!(controls.contains("Identify Gender"));
        assert_eq!(controls.matches("<button").count(), 2);
    }
}
