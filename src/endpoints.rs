//! Request URLs for the feedback API.
//!
//! Every user-supplied value is form-encoded (`application/x-www-form-urlencoded`, so a space
//! becomes `+`). Selected ids are encoded one by one and joined with a literal comma, which the
//! prediction backends split on.

use reqwest::Url;
use url::form_urlencoded;

use crate::error::Result;
use crate::models::{NewFeedback, RecordId};

pub const LIST_PATH: &str = "getallcontents";
pub const SUBMIT_PATH: &str = "enterfeedback";
pub const PREDICT_SENTIMENT_PATH: &str = "predictsentiment";
pub const PREDICT_GENDER_PATH: &str = "predictgender";

/// `GET {base}/getallcontents`
pub fn list_url(base: &Url) -> Result<Url> {
    Ok(base.join(LIST_PATH)?)
}

/// `GET {base}/enterfeedback?FirstName=..&LastName=..&Feedback=..`
pub fn submit_url(base: &Url, entry: &NewFeedback) -> Result<Url> {
    let mut url = base.join(SUBMIT_PATH)?;
    url.query_pairs_mut()
        .append_pair("FirstName", &entry.first_name)
        .append_pair("LastName", &entry.last_name)
        .append_pair("Feedback", &entry.feedback);
    Ok(url)
}

/// `GET {base}/predictsentiment?Id=id1,id2,..`
pub fn predict_sentiment_url(base: &Url, ids: &[RecordId]) -> Result<Url> {
    id_list_url(base, PREDICT_SENTIMENT_PATH, ids)
}

/// `GET {base}/predictgender?Id=id1,id2,..`
pub fn predict_gender_url(base: &Url, ids: &[RecordId]) -> Result<Url> {
    id_list_url(base, PREDICT_GENDER_PATH, ids)
}

/// Comma-joined ids in selection order, no trailing comma. Empty for an empty selection.
pub fn join_ids(ids: &[RecordId]) -> String {
    ids.iter()
        .map(|id| form_urlencoded::byte_serialize(id.as_str().as_bytes()).collect::<String>())
        .collect::<Vec<_>>()
        .join(",")
}

fn id_list_url(base: &Url, path: &str, ids: &[RecordId]) -> Result<Url> {
    let mut url = base.join(path)?;
    url.set_query(Some(&format!("Id={}", join_ids(ids))));
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base() -> Url {
        Url::parse("https://abc.execute-api.us-west-2.amazonaws.com/test/").unwrap()
    }

    fn ids(raw: &[&str]) -> Vec<RecordId> {
        raw.iter().map(|id| RecordId::from(*id)).collect()
    }

    fn query_map(url: &Url) -> HashMap<String, String> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_list_url() {
        assert_eq!(
            list_url(&base()).unwrap().as_str(),
            "https://abc.execute-api.us-west-2.amazonaws.com/test/getallcontents"
        );
    }

    #[test]
    fn test_predict_joins_ids_in_selection_order() {
        let url = predict_sentiment_url(&base(), &ids(&["1", "3", "7"])).unwrap();
        assert_eq!(url.path(), "/test/predictsentiment");
        assert_eq!(url.query(), Some("Id=1,3,7"));
        assert_eq!(query_map(&url)["Id"], "1,3,7");
    }

    #[test]
    fn test_predict_with_empty_selection_sends_empty_id() {
        let url = predict_sentiment_url(&base(), &[]).unwrap();
        assert_eq!(url.query(), Some("Id="));
        assert_eq!(query_map(&url)["Id"], "");
    }

    #[test]
    fn test_predict_gender_uses_its_own_path() {
        let url = predict_gender_url(&base(), &ids(&["a"])).unwrap();
        assert_eq!(url.path(), "/test/predictgender");
        assert_eq!(url.query(), Some("Id=a"));
    }

    #[test]
    fn test_ids_are_encoded_but_separators_are_not() {
        assert_eq!(join_ids(&ids(&["a&b", "c d", "e,f"])), "a%26b,c+d,e%2Cf");
    }

    #[test]
    fn test_ids_and_submit_values_share_one_encoding() {
        let entry = NewFeedback::new("c d", "x", "y");
        let submit = submit_url(&base(), &entry).unwrap();
        let predict = predict_sentiment_url(&base(), &ids(&["c d"])).unwrap();

        assert!(submit.query().unwrap().starts_with("FirstName=c+d&"));
        assert_eq!(predict.query(), Some("Id=c+d"));
        assert_eq!(query_map(&predict)["Id"], "c d");
    }

    #[test]
    fn test_submit_values_round_trip() {
        let entry = NewFeedback::new("Ann & Co", "Lee=Smith", "love it #1 & more = fun");
        let url = submit_url(&base(), &entry).unwrap();

        assert_eq!(url.path(), "/test/enterfeedback");
        let query = url.query().unwrap();
        assert!(!query.contains(' '));
        assert!(!query.contains('#'));
        assert!(url.fragment().is_none());

        let params = query_map(&url);
        assert_eq!(params.len(), 3);
        assert_eq!(params["FirstName"], "Ann & Co");
        assert_eq!(params["LastName"], "Lee=Smith");
        assert_eq!(params["Feedback"], "love it #1 & more = fun");
    }

    #[test]
    fn test_submit_keeps_parameter_order() {
        let url = submit_url(&base(), &NewFeedback::new("A", "B", "C")).unwrap();
        assert_eq!(url.query(), Some("FirstName=A&LastName=B&Feedback=C"));
    }
}
