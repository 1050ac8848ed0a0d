use std::sync::Arc;

use async_graphql::{Context, EmptyMutation, EmptySubscription, Object, SimpleObject};
use framecompare_shared::{
    diagram::render_diagram,
    models::{CategoryInfo, CircleRecord, FormatRecord, ReferencePreset},
    selection::SelectionState,
    svg::render_scene,
};

use crate::assets::Assets;

// GraphQL output types

#[derive(SimpleObject)]
pub struct GqlFormat {
    pub id: String,
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub diagonal: f64,
    pub category: String,
    pub medium: String,
    pub color: String,
    pub dasharray: String,
    pub category_label: String,
    pub category_order: i32,
    pub aspect: String,
}

impl From<&FormatRecord> for GqlFormat {
    fn from(f: &FormatRecord) -> Self {
        GqlFormat {
            id: f.id.clone(),
            name: f.name.clone(),
            width: f.width,
            height: f.height,
            diagonal: f.diagonal,
            category: f.category.clone(),
            medium: f.medium.clone(),
            color: f.color.clone(),
            dasharray: f.dasharray.clone(),
            category_label: f.category_label.clone(),
            category_order: f.category_order,
            aspect: f.aspect_label(),
        }
    }
}

#[derive(SimpleObject)]
pub struct GqlCategory {
    pub key: String,
    pub label: String,
    pub order: i32,
}

impl From<&CategoryInfo> for GqlCategory {
    fn from(c: &CategoryInfo) -> Self {
        GqlCategory {
            key: c.key.clone(),
            label: c.label.clone(),
            order: c.order,
        }
    }
}

#[derive(SimpleObject)]
pub struct GqlCircle {
    pub id: String,
    pub name: String,
    pub diameter: f64,
    pub notes: String,
    pub color: String,
}

impl From<&CircleRecord> for GqlCircle {
    fn from(c: &CircleRecord) -> Self {
        GqlCircle {
            id: c.id.clone(),
            name: c.name.clone(),
            diameter: c.diameter,
            notes: c.notes.clone(),
            color: c.color.clone(),
        }
    }
}

#[derive(SimpleObject)]
pub struct GqlReferencePreset {
    pub key: String,
    pub label: String,
    pub url: String,
}

impl From<&ReferencePreset> for GqlReferencePreset {
    fn from(p: &ReferencePreset) -> Self {
        GqlReferencePreset {
            key: p.key.clone(),
            label: p.label.clone(),
            url: p.url.clone(),
        }
    }
}

#[derive(SimpleObject)]
pub struct GqlCoverage {
    pub format_id: String,
    pub circle_id: String,
    pub covered: bool,
    /// Circle diameter minus format diagonal, in mm. Negative when not covered.
    pub margin: f64,
}

// Query root

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn formats(
        &self,
        ctx: &Context<'_>,
        category: Option<String>,
    ) -> async_graphql::Result<Vec<GqlFormat>> {
        let assets = ctx.data::<Arc<Assets>>()?;
        Ok(assets
            .catalog
            .formats()
            .iter()
            .filter(|f| match &category {
                Some(key) => &f.category == key,
                None => true,
            })
            .map(GqlFormat::from)
            .collect())
    }

    async fn categories(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<GqlCategory>> {
        let assets = ctx.data::<Arc<Assets>>()?;
        Ok(assets.catalog.categories().iter().map(GqlCategory::from).collect())
    }

    async fn circles(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<GqlCircle>> {
        let assets = ctx.data::<Arc<Assets>>()?;
        Ok(assets.catalog.circles().iter().map(GqlCircle::from).collect())
    }

    async fn reference_presets(
        &self,
        ctx: &Context<'_>,
    ) -> async_graphql::Result<Vec<GqlReferencePreset>> {
        let assets = ctx.data::<Arc<Assets>>()?;
        Ok(assets
            .catalog
            .presets()
            .iter()
            .map(GqlReferencePreset::from)
            .collect())
    }

    async fn coverage(
        &self,
        ctx: &Context<'_>,
        format_id: String,
        circle_id: String,
    ) -> async_graphql::Result<GqlCoverage> {
        let assets = ctx.data::<Arc<Assets>>()?;
        let format = assets
            .catalog
            .format(&format_id)
            .ok_or_else(|| async_graphql::Error::new(format!("Unknown format: {}", format_id)))?;
        let circle = assets
            .catalog
            .circle(&circle_id)
            .ok_or_else(|| async_graphql::Error::new(format!("Unknown circle: {}", circle_id)))?;
        Ok(GqlCoverage {
            format_id,
            circle_id,
            covered: format.covered_by(circle),
            margin: circle.diameter - format.diagonal,
        })
    }

    /// The comparison diagram as standalone SVG, or null when nothing is selected.
    async fn diagram_svg(
        &self,
        ctx: &Context<'_>,
        format_ids: Vec<String>,
        #[graphql(default)] circle_ids: Vec<String>,
    ) -> async_graphql::Result<Option<String>> {
        let assets = ctx.data::<Arc<Assets>>()?;
        let catalog = &assets.catalog;
        let mut state = SelectionState::new();
        for id in &format_ids {
            if !state.toggle_format(catalog, id, true) && !catalog.has_format(id) {
                return Err(async_graphql::Error::new(format!("Unknown format: {}", id)));
            }
        }
        for id in &circle_ids {
            if !state.toggle_circle(catalog, id, true) && !catalog.has_circle(id) {
                return Err(async_graphql::Error::new(format!("Unknown circle: {}", id)));
            }
        }
        let diagram = render_diagram(catalog, &state);
        Ok(diagram.scene().map(render_scene))
    }
}

pub type Schema = async_graphql::Schema<QueryRoot, EmptyMutation, EmptySubscription>;

pub fn build_schema(assets: Arc<Assets>) -> Schema {
    async_graphql::Schema::build(QueryRoot, EmptyMutation, EmptySubscription)
        .data(assets)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG_JSON: &str = include_str!("../../../../assets/catalog.json");

    fn schema() -> Schema {
        build_schema(Arc::new(Assets::from_json(CATALOG_JSON).unwrap()))
    }

    async fn run(query: &str) -> serde_json::Value {
        let resp = schema().execute(query).await;
        assert!(resp.errors.is_empty(), "errors: {:?}", resp.errors);
        resp.data.into_json().unwrap()
    }

    #[tokio::test]
    async fn test_formats_are_normalized() {
        let data = run(r#"{ formats { id width height diagonal aspect categoryLabel } }"#).await;
        let formats = data["formats"].as_array().unwrap();
        assert_eq!(formats.len(), 15);
        let six = formats.iter().find(|f| f["id"] == "6x7").unwrap();
        assert_eq!(six["width"], 70.0);
        assert_eq!(six["height"], 56.0);
        assert_eq!(six["diagonal"], 89.65);
        assert_eq!(six["aspect"], "1.25:1");
        assert_eq!(six["categoryLabel"], "Medium Format Still");
    }

    #[tokio::test]
    async fn test_formats_by_category() {
        let data = run(r#"{ formats(category: "large-format") { id } }"#).await;
        let ids: Vec<&str> = data["formats"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["4x5", "8x10"]);
    }

    #[tokio::test]
    async fn test_categories_in_display_order() {
        let data = run(r#"{ categories { key order } }"#).await;
        let orders: Vec<i64> = data["categories"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["order"].as_i64().unwrap())
            .collect();
        assert_eq!(orders, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[tokio::test]
    async fn test_circles_and_presets() {
        let data = run(r#"{ circles { id color } referencePresets { key url } }"#).await;
        assert_eq!(data["circles"].as_array().unwrap().len(), 11);
        let gfx = data["circles"]
            .as_array()
            .unwrap()
            .iter()
            .find(|c| c["id"] == "gfx")
            .unwrap();
        assert_eq!(gfx["color"], "#3AAA55");
        assert_eq!(data["referencePresets"][0]["key"], "street");
    }

    #[tokio::test]
    async fn test_coverage() {
        let data = run(
            r#"{
                pl: coverage(formatId: "ff-35mm", circleId: "pl-s35") { covered }
                gfx: coverage(formatId: "ff-35mm", circleId: "gfx") { covered margin }
            }"#,
        )
        .await;
        assert_eq!(data["pl"]["covered"], false);
        assert_eq!(data["gfx"]["covered"], true);
        let margin = data["gfx"]["margin"].as_f64().unwrap();
        assert!((margin - 11.73).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_coverage_unknown_id_errors() {
        let resp = schema()
            .execute(r#"{ coverage(formatId: "nope", circleId: "gfx") { covered } }"#)
            .await;
        assert_eq!(resp.errors.len(), 1);
        assert!(resp.errors[0].message.contains("Unknown format: nope"));
    }

    #[tokio::test]
    async fn test_diagram_svg() {
        let data = run(r#"{ diagramSvg(formatIds: ["ff-35mm", "6x7"], circleIds: ["gfx"]) }"#).await;
        let svg = data["diagramSvg"].as_str().unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"data-entity="format:6x7""#));
        assert!(svg.contains(r#"data-entity="circle:gfx""#));
    }

    #[tokio::test]
    async fn test_diagram_svg_empty_selection_is_null() {
        let resp = schema().execute(r#"{ diagramSvg(formatIds: []) }"#).await;
        assert!(resp.errors.is_empty());
        assert_eq!(resp.data.into_json().unwrap()["diagramSvg"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_schema_has_no_mutations() {
        let resp = schema()
            .execute(r#"mutation { createPlan(name: "x") }"#)
            .await;
        assert!(!resp.errors.is_empty());
    }
}
