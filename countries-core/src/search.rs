//! Query URL construction, response classification and ordering for
//! country searches.

use reqwest::{StatusCode, Url};

use crate::{
    error::SearchError,
    model::{Country, SearchRequest},
};

pub const COUNTRIES_BASE_URL: &str = "https://restcountries.com/v3.1/";

/// Only these fields are requested from REST Countries.
pub const COUNTRIES_FIELDS: &str =
    "name,capital,languages,subregion,population,flags,capitalInfo,demonyms";

/// `{base}{endpoint}/{query}?fields=...`, with the query as one encoded path segment.
pub fn countries_search_url(base: &str, request: &SearchRequest) -> Result<Url, SearchError> {
    let mut url =
        Url::parse(base).map_err(|err| SearchError::InvalidUrl(format!("{base}: {err}")))?;

    url.path_segments_mut()
        .map_err(|_| SearchError::InvalidUrl(format!("{base}: cannot be a base")))?
        .pop_if_empty()
        .push(request.mode.endpoint())
        .push(request.query.trim());

    url.query_pairs_mut().append_pair("fields", COUNTRIES_FIELDS);

    Ok(url)
}

/// Classify a countries response: 404 means no match, any other failure is generic.
pub fn decode_countries(status: StatusCode, body: &str) -> Result<Vec<Country>, SearchError> {
    if status == StatusCode::NOT_FOUND {
        return Err(SearchError::NoResults);
    }
    if !status.is_success() {
        return Err(SearchError::Status(status));
    }

    let countries: Vec<Country> = serde_json::from_str(body)?;
    Ok(countries)
}

pub fn sort_by_population_desc(countries: &mut [Country]) {
    countries.sort_by(|a, b| b.population.cmp(&a.population));
}

/// Header line printed above the cards.
pub fn result_message(count: usize) -> String {
    let suffix = if count > 1 { "s" } else { "" };
    format!("{count} result{suffix}:")
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::SearchMode;

    pub(crate) fn country_json(common: &str, population: u64) -> String {
        format!(
            r#"{{"name":{{"common":"{common}","official":"Republic of {common}","nativeName":{{}}}},
                "capital":["{common} City"],"population":{population},
                "flags":{{"png":"https://flagcdn.com/{common}.png","svg":""}}}}"#
        )
    }

    #[test]
    fn search_url_by_name() {
        let req = SearchRequest::new(SearchMode::Name, "sweden");
        let url = countries_search_url(COUNTRIES_BASE_URL, &req).unwrap();

        assert_eq!(
            url.as_str(),
            "https://restcountries.com/v3.1/name/sweden?fields=name%2Ccapital%2Clanguages%2Csubregion%2Cpopulation%2Cflags%2CcapitalInfo%2Cdemonyms"
        );
    }

    #[test]
    fn search_url_by_language_encodes_query() {
        let req = SearchRequest::new(SearchMode::Language, " cape verdean/x ");
        let url = countries_search_url(COUNTRIES_BASE_URL, &req).unwrap();

        assert_eq!(url.path(), "/v3.1/lang/cape%20verdean%2Fx");
    }

    #[test]
    fn search_url_rejects_invalid_base() {
        let req = SearchRequest::new(SearchMode::Name, "x");
        let err = countries_search_url("not a url", &req).unwrap_err();
        assert!(matches!(err, SearchError::InvalidUrl(_)));
        assert_eq!(
            err.user_message(),
            "There was an error, please try again later!"
        );
    }

    #[test]
    fn ok_response_yields_every_country() {
        let body = format!(
            "[{},{},{}]",
            country_json("Aland", 30_000),
            country_json("Brazil", 212_000_000),
            country_json("Chile", 19_000_000)
        );

        let countries = decode_countries(StatusCode::OK, &body).unwrap();
        assert_eq!(countries.len(), 3);
    }

    #[test]
    fn not_found_is_no_results() {
        let body = r#"{"status":404,"message":"Not Found"}"#;
        let err = decode_countries(StatusCode::NOT_FOUND, body).unwrap_err();

        assert!(err.is_no_results());
        assert_eq!(err.user_message(), "No results");
    }

    #[test]
    fn server_error_is_generic() {
        let err = decode_countries(StatusCode::BAD_GATEWAY, "").unwrap_err();

        assert!(matches!(err, SearchError::Status(StatusCode::BAD_GATEWAY)));
        assert_eq!(
            err.user_message(),
            "There was an error, please try again later!"
        );
    }

    #[test]
    fn malformed_body_is_decode_error() {
        let err = decode_countries(StatusCode::OK, "{not json").unwrap_err();
        assert!(matches!(err, SearchError::Decode(_)));
    }

    #[test]
    fn sorts_descending_by_population() {
        let body = format!(
            "[{},{},{}]",
            country_json("Aland", 30_000),
            country_json("Brazil", 212_000_000),
            country_json("Chile", 19_000_000)
        );
        let mut countries = decode_countries(StatusCode::OK, &body).unwrap();

        sort_by_population_desc(&mut countries);

        let names: Vec<_> = countries.iter().map(|c| c.name.common.as_str()).collect();
        assert_eq!(names, ["Brazil", "Chile", "Aland"]);
    }

    #[test]
    fn result_message_pluralises_above_one() {
        assert_eq!(result_message(0), "0 result:");
        assert_eq!(result_message(1), "1 result:");
        assert_eq!(result_message(2), "2 results:");
    }
}
