use diesel::prelude::*;
use crate::db::schema::news;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = news)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct News {
    pub author: Option<String>,
    pub content: Option<String>,
    pub description: Option<String>,
    pub published_at: Option<String>,
    pub source: Option<String>,
    pub title: Option<String>,
    pub url: String,
    pub url_to_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = news)]
#[diesel(treat_none_as_null = true)]
pub struct NewNews {
    pub author: Option<String>,
    pub content: Option<String>,
    pub description: Option<String>,
    pub published_at: Option<String>,
    pub source: Option<String>,
    pub title: Option<String>,
    pub url: String,
    pub url_to_image: Option<String>,
}
