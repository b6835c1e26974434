//! In-memory stand-in for the VK API, used by integration tests.
//!
//! Serves `POST /method/{method}` with form-encoded parameters and answers the
//! way VK does: HTTP 200 with either `{"response": ...}` or
//! `{"error": {"error_code", "error_msg", "request_params"}}`. Only a handful
//! of `docs.*` and `friends.*` methods are backed by state; every other
//! method name gets error 3.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, State},
    routing::post,
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

/// Id of the user every access token belongs to.
pub const CURRENT_USER_ID: i64 = 1;

/// Friend lists allowed per user before error 173.
pub const MAX_FRIEND_LISTS: usize = 24;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Doc {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub ext: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FriendList {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Default)]
pub struct Store {
    docs: BTreeMap<i64, Doc>,
    lists: BTreeMap<i64, FriendList>,
    next_doc_id: i64,
    next_list_id: i64,
}

pub type Db = Arc<RwLock<Store>>;

type ApiResult = Result<Value, (i64, String)>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/method/{method}", post(dispatch))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn dispatch(
    State(db): State<Db>,
    Path(method): Path<String>,
    Form(params): Form<HashMap<String, String>>,
) -> Json<Value> {
    debug!(%method, params = params.len(), "mock VK call");

    let result = if !params.contains_key("access_token") {
        Err((5, "User authorization failed: no access_token passed.".to_string()))
    } else if !params.contains_key("v") {
        Err((8, "Invalid request: v is required".to_string()))
    } else {
        match method.as_str() {
            "docs.get" => docs_get(&db, &params).await,
            "docs.getById" => docs_get_by_id(&db, &params).await,
            "docs.getUploadServer" => Ok(json!({
                "upload_url": format!("https://pu.vk.com/upload/{}", Uuid::new_v4())
            })),
            "docs.save" => docs_save(&db, &params).await,
            "docs.edit" => docs_edit(&db, &params).await,
            "docs.delete" => docs_delete(&db, &params).await,
            "docs.search" => docs_search(&db, &params).await,
            "friends.getLists" => friends_get_lists(&db).await,
            "friends.addList" => friends_add_list(&db, &params).await,
            "friends.deleteList" => friends_delete_list(&db, &params).await,
            _ => Err((3, "Unknown method passed".to_string())),
        }
    };

    Json(match result {
        Ok(response) => json!({ "response": response }),
        Err((code, message)) => json!({
            "error": {
                "error_code": code,
                "error_msg": message,
                "request_params": [
                    {"key": "method", "value": method},
                    {"key": "oauth", "value": "1"}
                ]
            }
        }),
    })
}

fn int_param(params: &HashMap<String, String>, key: &str) -> Result<i64, (i64, String)> {
    params
        .get(key)
        .and_then(|v| v.trim().parse().ok())
        .ok_or_else(|| {
            (
                100,
                format!("One of the parameters specified was missing or invalid: {key} is undefined"),
            )
        })
}

fn owner_param(params: &HashMap<String, String>) -> i64 {
    int_param(params, "owner_id").unwrap_or(CURRENT_USER_ID)
}

fn items(values: Vec<Value>) -> Value {
    json!({ "count": values.len(), "items": values })
}

async fn docs_get(db: &Db, params: &HashMap<String, String>) -> ApiResult {
    let owner_id = owner_param(params);
    let store = db.read().await;
    let docs = store
        .docs
        .values()
        .filter(|d| d.owner_id == owner_id)
        .map(|d| json!(d))
        .collect();
    Ok(items(docs))
}

async fn docs_get_by_id(db: &Db, params: &HashMap<String, String>) -> ApiResult {
    let raw = params
        .get("docs")
        .ok_or_else(|| (100, "One of the parameters specified was missing or invalid: docs is undefined".to_string()))?;
    let store = db.read().await;
    let docs = raw
        .split(',')
        .filter_map(|pair| pair.trim().split_once('_'))
        .filter_map(|(owner, id)| Some((owner.parse::<i64>().ok()?, id.parse::<i64>().ok()?)))
        .filter_map(|(owner, id)| store.docs.get(&id).filter(|d| d.owner_id == owner))
        .map(|d| json!(d))
        .collect();
    Ok(Value::Array(docs))
}

async fn docs_save(db: &Db, params: &HashMap<String, String>) -> ApiResult {
    let file = params
        .get("file")
        .filter(|f| !f.is_empty())
        .ok_or_else(|| (100, "One of the parameters specified was missing or invalid: file is undefined".to_string()))?;
    let title = params.get("title").filter(|t| !t.is_empty()).unwrap_or(file);
    let ext = file.rsplit_once('.').map(|(_, ext)| ext).unwrap_or_default();

    let mut store = db.write().await;
    store.next_doc_id += 1;
    let doc = Doc {
        id: store.next_doc_id,
        owner_id: CURRENT_USER_ID,
        title: title.clone(),
        ext: ext.to_string(),
        tags: Vec::new(),
    };
    store.docs.insert(doc.id, doc.clone());
    Ok(json!({ "type": "doc", "doc": doc }))
}

async fn docs_edit(db: &Db, params: &HashMap<String, String>) -> ApiResult {
    let owner_id = owner_param(params);
    let doc_id = int_param(params, "doc_id")?;
    let title = params.get("title").map(|t| t.trim()).unwrap_or_default();
    if title.is_empty() {
        return Err((1152, "Invalid document title".to_string()));
    }

    let mut store = db.write().await;
    let doc = store
        .docs
        .get_mut(&doc_id)
        .filter(|d| d.owner_id == owner_id)
        .ok_or_else(|| (1150, "Invalid document id".to_string()))?;
    doc.title = title.to_string();
    if let Some(tags) = params.get("tags") {
        doc.tags = tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect();
    }
    Ok(json!(1))
}

async fn docs_delete(db: &Db, params: &HashMap<String, String>) -> ApiResult {
    let owner_id = owner_param(params);
    let doc_id = int_param(params, "doc_id")?;
    let mut store = db.write().await;
    let Some(doc) = store.docs.get(&doc_id) else {
        return Err((1150, "Invalid document id".to_string()));
    };
    if doc.owner_id != owner_id {
        return Err((1151, "Access to document deleting is denied".to_string()));
    }
    store.docs.remove(&doc_id);
    Ok(json!(1))
}

async fn docs_search(db: &Db, params: &HashMap<String, String>) -> ApiResult {
    let query = params
        .get("q")
        .map(|q| q.to_lowercase())
        .ok_or_else(|| (100, "One of the parameters specified was missing or invalid: q is undefined".to_string()))?;
    let store = db.read().await;
    let docs = store
        .docs
        .values()
        .filter(|d| d.title.to_lowercase().contains(&query))
        .map(|d| json!(d))
        .collect();
    Ok(items(docs))
}

async fn friends_get_lists(db: &Db) -> ApiResult {
    let store = db.read().await;
    Ok(items(store.lists.values().map(|l| json!(l)).collect()))
}

async fn friends_add_list(db: &Db, params: &HashMap<String, String>) -> ApiResult {
    let name = params
        .get("name")
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| (100, "One of the parameters specified was missing or invalid: name is undefined".to_string()))?;
    let mut store = db.write().await;
    if store.lists.len() >= MAX_FRIEND_LISTS {
        return Err((173, "Reached the maximum number of lists".to_string()));
    }
    store.next_list_id += 1;
    let list = FriendList {
        id: store.next_list_id,
        name: name.clone(),
    };
    store.lists.insert(list.id, list.clone());
    Ok(json!({ "list_id": list.id }))
}

async fn friends_delete_list(db: &Db, params: &HashMap<String, String>) -> ApiResult {
    let list_id = int_param(params, "list_id")?;
    let mut store = db.write().await;
    store
        .lists
        .remove(&list_id)
        .map(|_| json!(1))
        .ok_or_else(|| (171, "Invalid list id".to_string()))
}
