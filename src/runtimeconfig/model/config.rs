use serde::{Deserialize, Serialize};

use super::variable::VariableResource;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigResource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One page of `variables.list`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableListResponse {
    #[serde(default)]
    pub variables: Vec<VariableResource>,
    pub next_page_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list_response() {
        let page: VariableListResponse = serde_json::from_str("{}").unwrap();
        assert!(page.variables.is_empty());
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn test_list_response_with_token() {
        let page: VariableListResponse = serde_json::from_str(
            r#"{
                "nextPageToken": "TOKEN",
                "variables": [
                    {"name": "projects/p/configs/c/variables/one", "updateTime": "2016-04-14T21:21:54.5000Z"},
                    {"name": "projects/p/configs/c/variables/two/three"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(page.variables.len(), 2);
        assert_eq!(page.next_page_token.as_deref(), Some("TOKEN"));
        assert_eq!(
            page.variables[1].name.as_deref(),
            Some("projects/p/configs/c/variables/two/three")
        );
    }
}
