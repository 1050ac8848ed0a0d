use std::collections::HashMap;
use std::sync::Arc;

use framecompare_shared::catalog::Catalog;
use framecompare_shared::models::{
    CategoryMeta, CircleMeta, FormatStyle, RawCatalog, RawCircle, RawFormat, ReferencePreset,
};
use serde::{Deserialize, Serialize};

use crate::config::GRAPHQL_PATH;

#[derive(Debug, Clone, Serialize)]
pub struct GraphQLRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLError {
    pub message: String,
}

impl<T> GraphQLResponse<T> {
    /// First reported error wins; otherwise the data must be present.
    pub fn into_result(self) -> Result<T, String> {
        if let Some(error) = self.errors.and_then(|e| e.into_iter().next()) {
            return Err(error.message);
        }
        self.data.ok_or_else(|| "No data returned".to_string())
    }
}

fn api_url() -> Result<String, String> {
    let origin = web_sys::window()
        .ok_or("No window")?
        .location()
        .origin()
        .map_err(|_| "No window origin".to_string())?;
    Ok(format!("{}{}", origin, GRAPHQL_PATH))
}

async fn query<T: for<'de> Deserialize<'de>>(
    query_str: &str,
    variables: Option<serde_json::Value>,
) -> Result<T, String> {
    let req = GraphQLRequest {
        query: query_str.to_string(),
        variables,
    };

    let resp = reqwest::Client::new()
        .post(api_url()?)
        .json(&req)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let gql_resp: GraphQLResponse<T> = resp.json().await.map_err(|e| e.to_string())?;
    gql_resp.into_result()
}

// Types mirroring the GraphQL schema

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatData {
    pub id: String,
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub diagonal: f64,
    pub category: String,
    #[serde(default)]
    pub medium: String,
    pub color: String,
    pub dasharray: String,
    pub category_label: String,
    pub category_order: i32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleData {
    pub id: String,
    pub name: String,
    pub diameter: f64,
    #[serde(default)]
    pub notes: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PresetData {
    pub key: String,
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    pub formats: Vec<FormatData>,
    pub circles: Vec<CircleData>,
    #[serde(default)]
    pub reference_presets: Vec<PresetData>,
}

impl CatalogResponse {
    /// Rebuild the raw tables so the shared loader can run on the client.
    pub fn into_raw(self) -> RawCatalog {
        let mut categories: HashMap<String, CategoryMeta> = HashMap::new();
        let mut formats = Vec::with_capacity(self.formats.len());
        for f in self.formats {
            categories
                .entry(f.category.clone())
                .or_insert_with(|| CategoryMeta {
                    label: f.category_label.clone(),
                    order: f.category_order,
                    formats: HashMap::new(),
                })
                .formats
                .insert(
                    f.id.clone(),
                    FormatStyle {
                        color: f.color,
                        dasharray: f.dasharray,
                    },
                );
            formats.push(RawFormat {
                id: f.id,
                name: f.name,
                width: f.width,
                height: f.height,
                diagonal: f.diagonal,
                category: f.category,
                medium: f.medium,
            });
        }

        let mut circle_meta = HashMap::new();
        let circles = self
            .circles
            .into_iter()
            .map(|c| {
                circle_meta.insert(c.id.clone(), CircleMeta { color: c.color });
                RawCircle {
                    id: c.id,
                    name: c.name,
                    diameter: c.diameter,
                    notes: c.notes,
                }
            })
            .collect();

        RawCatalog {
            formats,
            categories,
            circles,
            circle_meta,
            reference_presets: self
                .reference_presets
                .into_iter()
                .map(|p| ReferencePreset {
                    key: p.key,
                    label: p.label,
                    url: p.url,
                })
                .collect(),
        }
    }
}

const CATALOG_QUERY: &str = r#"query {
    formats { id name width height diagonal category medium color dasharray categoryLabel categoryOrder }
    circles { id name diameter notes color }
    referencePresets { key label url }
}"#;

pub async fn fetch_catalog() -> Result<Arc<Catalog>, String> {
    let resp: CatalogResponse = query(CATALOG_QUERY, None).await?;
    let catalog = Catalog::from_raw(&resp.into_raw());
    tracing::info!(
        formats = catalog.formats().len(),
        circles = catalog.circles().len(),
        "Catalog fetched"
    );
    Ok(Arc::new(catalog))
}
