use serde::Serialize;

/// Success envelope: `{ "success": true, "data": ... }`, with `count`
/// included on list responses.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            count: None,
            data,
        }
    }

    pub fn list(count: usize, data: T) -> Self {
        Self {
            success: true,
            count: Some(count),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_envelope_omits_count() {
        let json = serde_json::to_value(ApiResponse::ok("hello")).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], "hello");
        assert!(json.get("count").is_none());
    }

    #[test]
    fn list_envelope_carries_count() {
        let json = serde_json::to_value(ApiResponse::list(2, vec![1, 2])).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["count"], 2);
    }
}
