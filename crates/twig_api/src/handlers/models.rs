//! Model routes.
//!
//! # Responsibility
//! - Serve CRUD and changelog reads for the `models` collection.
//! - Require an actor on create, update and delete.

use crate::error::ApiResult;
use crate::extract::{Actor, Tenant};
use crate::state::AppState;
use crate::validation::{ModelCreateBody, ModelUpdateBody};
use crate::view::{ChangelogView, ModelView, SummaryView};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use log::info;
use twig_core::{DocumentDraft, DocumentKind, ModelPayload, ModelRepository, Revision};

pub async fn list(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
) -> ApiResult<Json<Vec<SummaryView>>> {
    let summaries = state
        .with_tenant(tenant, |handle| {
            Ok(ModelRepository::tenant(handle).list_all()?)
        })
        .await?;
    Ok(Json(SummaryView::list(
        DocumentKind::Model,
        summaries,
        &state.urls,
    )))
}

pub async fn create(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Actor(actor): Actor,
    payload: Result<Json<ModelCreateBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ModelView>)> {
    let Json(body) = payload?;
    body.validate()?;

    let document = state
        .with_tenant(tenant, move |handle| {
            let draft = DocumentDraft::new(
                body.name,
                ModelPayload {
                    entities: body.entities,
                },
            );
            let repo = ModelRepository::tenant(handle);
            Ok(repo.create(draft, &body.commit_message, &actor)?)
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ModelView::new(document, &state.urls)),
    ))
}

pub async fn get(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Path(name): Path<String>,
) -> ApiResult<Json<ModelView>> {
    let document = state
        .with_tenant(tenant, move |handle| {
            Ok(ModelRepository::tenant(handle).find_by_name(&name)?)
        })
        .await?;
    Ok(Json(ModelView::new(document, &state.urls)))
}

pub async fn update(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Actor(actor): Actor,
    Path(name): Path<String>,
    payload: Result<Json<ModelUpdateBody>, JsonRejection>,
) -> ApiResult<Json<ModelView>> {
    let Json(body) = payload?;
    body.validate()?;

    let document = state
        .with_tenant(tenant, move |handle| {
            let draft = DocumentDraft::new(
                body.name,
                ModelPayload {
                    entities: body.entities,
                },
            );
            Ok(ModelRepository::tenant(handle).update(
                &name,
                &Revision::new(body.revision),
                draft,
                &body.commit_message,
                &actor,
            )?)
        })
        .await?;
    Ok(Json(ModelView::new(document, &state.urls)))
}

pub async fn delete(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Actor(actor): Actor,
    Path(name): Path<String>,
) -> ApiResult<StatusCode> {
    let target = name.clone();
    state
        .with_tenant(tenant, move |handle| {
            Ok(ModelRepository::tenant(handle).delete(&target)?)
        })
        .await?;
    info!("event=model_delete module=api status=ok name={name} actor={actor}");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn changelog(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Path(name): Path<String>,
) -> ApiResult<Json<ChangelogView>> {
    let changelog = state
        .with_tenant(tenant, move |handle| {
            Ok(ModelRepository::tenant(handle).changelog(&name)?)
        })
        .await?;
    Ok(Json(ChangelogView { changelog }))
}
