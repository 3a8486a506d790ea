//! Twiglet routes.
//!
//! # Responsibility
//! - Serve CRUD and changelog reads for the `twiglets` collection.
//! - Route creation through seeding or cloning.
//! - Keep the stored model reference when an update omits it.

use crate::error::ApiResult;
use crate::extract::{Actor, Tenant};
use crate::state::AppState;
use crate::validation::{TwigletCreateBody, TwigletUpdateBody};
use crate::view::{ChangelogView, SummaryView, TwigletView};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use log::info;
use twig_core::{
    DocumentDraft, DocumentKind, ModelRepository, Revision, TwigletCreateRequest, TwigletPayload,
    TwigletRepository, TwigletService,
};

pub async fn list(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
) -> ApiResult<Json<Vec<SummaryView>>> {
    let summaries = state
        .with_tenant(tenant, |handle| {
            Ok(TwigletRepository::tenant(handle).list_all()?)
        })
        .await?;
    Ok(Json(SummaryView::list(
        DocumentKind::Twiglet,
        summaries,
        &state.urls,
    )))
}

pub async fn create(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Actor(actor): Actor,
    payload: Result<Json<TwigletCreateBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TwigletView>)> {
    let Json(body) = payload?;
    body.validate()?;

    let document = state
        .with_tenant(tenant, move |handle| {
            let service = TwigletService::new(
                ModelRepository::tenant(handle),
                TwigletRepository::tenant(handle),
            );
            let request = TwigletCreateRequest {
                name: body.name,
                description: body.description,
                model: body.model.unwrap_or_default(),
                clone_source: body.clone_twiglet,
                commit_message: body.commit_message,
            };
            Ok(service.create(request, &actor)?)
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(TwigletView::new(document, &state.urls)),
    ))
}

pub async fn get(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Path(name): Path<String>,
) -> ApiResult<Json<TwigletView>> {
    let document = state
        .with_tenant(tenant, move |handle| {
            Ok(TwigletRepository::tenant(handle).find_by_name(&name)?)
        })
        .await?;
    Ok(Json(TwigletView::new(document, &state.urls)))
}

pub async fn update(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Actor(actor): Actor,
    Path(name): Path<String>,
    payload: Result<Json<TwigletUpdateBody>, JsonRejection>,
) -> ApiResult<Json<TwigletView>> {
    let Json(body) = payload?;
    body.validate()?;

    let document = state
        .with_tenant(tenant, move |handle| {
            let repo = TwigletRepository::tenant(handle);
            let model = match body.model {
                Some(model) => model,
                None => repo.find_by_name(&name)?.payload.model,
            };
            let draft = DocumentDraft::new(
                body.name,
                TwigletPayload {
                    description: body.description,
                    model,
                    nodes: body.nodes,
                    links: body.links,
                },
            );
            Ok(repo.update(
                &name,
                &Revision::new(body.revision),
                draft,
                &body.commit_message,
                &actor,
            )?)
        })
        .await?;
    Ok(Json(TwigletView::new(document, &state.urls)))
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
            Ok(TwigletRepository::tenant(handle).delete(&target)?)
        })
        .await?;
    info!("event=twiglet_delete module=api status=ok name={name} actor={actor}");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn changelog(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Path(name): Path<String>,
) -> ApiResult<Json<ChangelogView>> {
    let changelog = state
        .with_tenant(tenant, move |handle| {
            Ok(TwigletRepository::tenant(handle).changelog(&name)?)
        })
        .await?;
    Ok(Json(ChangelogView { changelog }))
}
