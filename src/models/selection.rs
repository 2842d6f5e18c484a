use url::{form_urlencoded, Url};

use crate::models::item::SelectableItem;

/// Query key the total endpoint collects the selected ids from.
pub const SELECTED_IDS_KEY: &str = "selected_ids[]";

/// Ids of the checked items, in document order.
///
/// Rebuilt from scratch on every change event; duplicates are kept as they
/// appear on the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet(Vec<String>);

impl SelectionSet {
    pub fn scan(items: &[SelectableItem]) -> Self {
        Self(
            items
                .iter()
                .filter(|item| item.selected)
                .map(|item| item.id.clone())
                .collect(),
        )
    }

    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(ids.into_iter().map(Into::into).collect())
    }

    pub fn ids(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Encodes the set as `selected_ids[]=a&selected_ids[]=b`.
    ///
    /// The key is written literally so the server sees the repeated-key shape it
    /// expects; only the values are form-encoded. An empty set still yields one
    /// key with an empty value.
    pub fn to_query(&self) -> String {
        if self.0.is_empty() {
            return format!("{}=", SELECTED_IDS_KEY);
        }

        self.0
            .iter()
            .map(|id| format!("{}={}", SELECTED_IDS_KEY, encode_value(id)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Full request url: `base` joined with `path`, with this set as the query.
    pub fn request_url(&self, base: &Url, path: &str) -> Result<Url, url::ParseError> {
        let mut url = base.join(path)?;
        url.set_query(Some(&self.to_query()));
        Ok(url)
    }
}

fn encode_value(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<SelectableItem> {
        vec![
            SelectableItem::new("1", "Product A").checked(),
            SelectableItem::new("2", "Product B"),
            SelectableItem::new("3", "Product C").checked(),
        ]
    }

    #[test]
    fn test_scan_keeps_document_order_and_skips_unchecked() {
        let selection = SelectionSet::scan(&items());
        assert_eq!(selection.ids(), ["1", "3"]);
        assert_eq!(selection.to_query(), "selected_ids[]=1&selected_ids[]=3");
    }

    #[test]
    fn test_every_subset_is_encoded_in_document_order() {
        let ids = ["1", "2", "3", "4"];
        for mask in 0u32..(1 << ids.len()) {
            let items: Vec<SelectableItem> = ids
                .iter()
                .enumerate()
                .map(|(i, id)| {
                    let item = SelectableItem::new(*id, format!("Product {}", id));
                    if mask & (1 << i) != 0 {
                        item.checked()
                    } else {
                        item
                    }
                })
                .collect();

            let expected: Vec<String> = ids
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, id)| format!("selected_ids[]={}", id))
                .collect();
            let expected = if expected.is_empty() {
                "selected_ids[]=".to_string()
            } else {
                expected.join("&")
            };

            assert_eq!(SelectionSet::scan(&items).to_query(), expected, "mask {:04b}", mask);
        }
    }

    #[test]
    fn test_empty_selection_still_has_key() {
        let selection = SelectionSet::scan(&[SelectableItem::new("1", "Product A")]);
        assert!(selection.is_empty());
        assert_eq!(selection.to_query(), "selected_ids[]=");
    }

    #[test]
    fn test_duplicates_are_not_collapsed() {
        let items = vec![
            SelectableItem::new("9", "first").checked(),
            SelectableItem::new("9", "second").checked(),
        ];
        let selection = SelectionSet::scan(&items);
        assert_eq!(selection.len(), 2);
        assert_eq!(selection.to_query(), "selected_ids[]=9&selected_ids[]=9");
    }

    #[test]
    fn test_reserved_characters_are_encoded_in_values_only() {
        let selection = SelectionSet::from_ids(["a&b=c", "x y", "#1", "é"]);
        assert_eq!(
            selection.to_query(),
            "selected_ids[]=a%26b%3Dc&selected_ids[]=x+y&selected_ids[]=%231&selected_ids[]=%C3%A9"
        );
    }

    #[test]
    fn test_request_url_joins_path_and_query() {
        let base = Url::parse("http://127.0.0.1:8000").unwrap();
        let url = SelectionSet::from_ids(["1", "2"])
            .request_url(&base, "/calculate_total")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8000/calculate_total?selected_ids[]=1&selected_ids[]=2"
        );
    }

    #[test]
    fn test_request_url_replaces_base_query() {
        let base = Url::parse("http://shop.test/cart/?stale=1").unwrap();
        let url = SelectionSet::default()
            .request_url(&base, "/calculate_total")
            .unwrap();
        assert_eq!(url.as_str(), "http://shop.test/calculate_total?selected_ids[]=");
    }
}
