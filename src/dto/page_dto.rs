use serde::{Deserialize, Serialize};

use crate::services::pagination::Page;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse<T> {
    pub data: Vec<T>,
    pub page: i64,
    pub page_size: i64,
    pub total_count: i64,
    pub total_pages: i64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl<T> PagedResponse<T> {
    pub fn from_page<M>(page: Page<M>) -> Self
    where
        M: Into<T>,
    {
        let has_previous_page = page.has_previous_page();
        let has_next_page = page.has_next_page();
        let page = page.map(Into::into);
        Self {
            data: page.items,
            page: page.page,
            page_size: page.page_size,
            total_count: page.total_count,
            total_pages: page.total_pages,
            has_previous_page,
            has_next_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::pagination::PageRequest;

    #[test]
    fn serializes_with_navigation_metadata() {
        let page = Page::new(vec![1_i64, 2], PageRequest::new(Some(2), Some(2)), 5);
        let response: PagedResponse<i64> = PagedResponse::from_page(page);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["data"], serde_json::json!([1, 2]));
        assert_eq!(json["page"], 2);
        assert_eq!(json["pageSize"], 2);
        assert_eq!(json["totalCount"], 5);
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["hasPreviousPage"], true);
        assert_eq!(json["hasNextPage"], true);
    }
}
