//! Client-facing shapes for upstream list pages and detail records.
//!
//! The upstream payloads are large and deeply nested; these DTOs keep the
//! handful of fields the frontend renders. Missing upstream fields become
//! `null` rather than failing the request.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::external::pokeapi::{NamedResource, ResourceDetail, ResourcePage};

static RESOURCE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/pokemon/(\d+)/?$").expect("resource id pattern is a valid regex")
});

/// Numeric id at the end of a resource URL such as
/// `https://pokeapi.co/api/v2/pokemon/25/`.
pub fn resource_id_from_url(url: &str) -> Option<u64> {
    RESOURCE_ID
        .captures(url)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonSummary {
    pub id: Option<u64>,
    pub name: String,
    pub url: String,
}

impl From<NamedResource> for PokemonSummary {
    fn from(resource: NamedResource) -> Self {
        Self {
            id: resource_id_from_url(&resource.url),
            name: resource.name,
            url: resource.url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonListResponse {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<PokemonSummary>,
}

impl From<ResourcePage> for PokemonListResponse {
    fn from(page: ResourcePage) -> Self {
        Self {
            count: page.count,
            next: page.next,
            previous: page.previous,
            results: page.results.into_iter().map(PokemonSummary::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityResponse {
    pub name: Value,
    pub is_hidden: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpritesResponse {
    pub front_default: Value,
    pub official_artwork: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonDetailResponse {
    pub id: u64,
    pub name: String,
    pub height: Value,
    pub weight: Value,
    pub base_experience: Value,
    pub types: Vec<Value>,
    pub abilities: Vec<AbilityResponse>,
    pub sprites: SpritesResponse,
    pub stats: Map<String, Value>,
}

impl From<ResourceDetail> for PokemonDetailResponse {
    fn from(detail: ResourceDetail) -> Self {
        let types = array(&detail, "types")
            .map(|t| pointer(t, "/type/name"))
            .collect();

        let abilities = array(&detail, "abilities")
            .map(|a| AbilityResponse {
                name: pointer(a, "/ability/name"),
                is_hidden: pointer(a, "/is_hidden"),
            })
            .collect();

        let sprites = detail.attribute("sprites");
        let sprites = SpritesResponse {
            front_default: sprites
                .map(|s| pointer(s, "/front_default"))
                .unwrap_or(Value::Null),
            official_artwork: sprites
                .map(|s| pointer(s, "/other/official-artwork/front_default"))
                .unwrap_or(Value::Null),
        };

        let stats = array(&detail, "stats")
            .filter_map(|s| {
                let name = s.pointer("/stat/name")?.as_str()?.to_string();
                Some((name, pointer(s, "/base_stat")))
            })
            .collect();

        Self {
            height: attribute(&detail, "height"),
            weight: attribute(&detail, "weight"),
            base_experience: attribute(&detail, "base_experience"),
            types,
            abilities,
            sprites,
            stats,
            id: detail.id,
            name: detail.name,
        }
    }
}

fn attribute(detail: &ResourceDetail, name: &str) -> Value {
    detail.attribute(name).cloned().unwrap_or(Value::Null)
}

fn array<'a>(detail: &'a ResourceDetail, name: &str) -> impl Iterator<Item = &'a Value> {
    detail
        .attribute(name)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

fn pointer(value: &Value, path: &str) -> Value {
    value.pointer(path).cloned().unwrap_or(Value::Null)
}
