diesel::table! {
    news (url) {
        author -> Nullable<Text>,
        content -> Nullable<Text>,
        description -> Nullable<Text>,
        #[sql_name = "publishedAt"]
        published_at -> Nullable<Text>,
        source -> Nullable<Text>,
        title -> Nullable<Text>,
        url -> Text,
        #[sql_name = "urlToImage"]
        url_to_image -> Nullable<Text>,
    }
}

/// DDL for [`news`]. SQLite keeps the declared lengths but does not enforce them.
pub const CREATE_NEWS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS news (
    author VARCHAR(100),
    content VARCHAR(255),
    description VARCHAR(255),
    "publishedAt" VARCHAR(255),
    source VARCHAR(200),
    title VARCHAR(100),
    url VARCHAR(255) NOT NULL,
    "urlToImage" VARCHAR(255),
    PRIMARY KEY (url)
)
"#;
