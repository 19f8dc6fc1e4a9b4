//! Cache key construction.
//!
//! Key construction is owned here, not by the cache: a fixed key for the
//! author list, the post id itself for blog-by-id, and a namespace prefix
//! plus the serialized query for filtered lists.

use uuid::Uuid;

use crate::application::repos::BlogListQuery;

pub const BLOGGERS: &str = "bloggers";

const BLOG_LIST_PREFIX: &str = "getBlogs";

pub fn blog(id: Uuid) -> String {
    id.to_string()
}

pub fn blog_list(query: &BlogListQuery) -> String {
    let serialized = serde_json::to_string(query).expect("list query serializes");
    format!("{BLOG_LIST_PREFIX}{serialized}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blog_key_is_the_hyphenated_id() {
        let id = Uuid::nil();
        assert_eq!(blog(id), "00000000-0000-0000-0000-000000000000");
    }

    #[test]
    fn list_key_is_deterministic() {
        let query = BlogListQuery {
            published: Some(true),
        };
        assert_eq!(blog_list(&query), blog_list(&query));
    }

    #[test]
    fn distinct_filters_produce_distinct_keys() {
        let published = BlogListQuery {
            published: Some(true),
        };
        let unpublished = BlogListQuery {
            published: Some(false),
        };
        let unfiltered = BlogListQuery::default();

        assert_ne!(blog_list(&published), blog_list(&unpublished));
        assert_ne!(blog_list(&published), blog_list(&unfiltered));
    }

    #[test]
    fn list_key_carries_the_namespace_prefix() {
        let key = blog_list(&BlogListQuery::default());
        assert!(key.starts_with("getBlogs"));
    }

    #[test]
    fn list_key_never_collides_with_fixed_keys() {
        let key = blog_list(&BlogListQuery::default());
        assert_ne!(key, BLOGGERS);
        assert_ne!(key, blog(Uuid::nil()));
    }
}
