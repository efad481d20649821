use axum::{extract::State, routing::get};
use blockgate_core::{Block, BlockHash, BlockHeight, ChainClient, Header};
use futures_util::future::try_join_all;
use serde::{Deserialize, Serialize};

use crate::{
    controller::{Controller, Routes},
    error::ApiError,
    params::{ApiPath, ApiQuery, BlockRange},
    sanitize::SanitizedJson,
    Facade,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderModel {
    pub parent_hash: BlockHash,
    pub number: BlockHeight,
    pub state_root: BlockHash,
    pub extrinsics_root: BlockHash,
    pub digest: DigestModel,
}

#[derive(Debug, Clone, Serialize)]
pub struct DigestModel {
    pub logs: Vec<String>,
}

impl From<Header> for HeaderModel {
    fn from(value: Header) -> Self {
        Self {
            parent_hash: value.parent_hash,
            number: value.number,
            state_root: value.state_root,
            extrinsics_root: value.extrinsics_root,
            digest: DigestModel {
                logs: value.digest_logs,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockModel {
    pub number: BlockHeight,
    pub hash: BlockHash,
    pub parent_hash: BlockHash,
    pub state_root: BlockHash,
    pub extrinsics_root: BlockHash,
    pub logs: Vec<String>,
    pub extrinsics: Vec<String>,
}

impl BlockModel {
    fn new(hash: BlockHash, block: Block) -> Self {
        Self {
            number: block.header.number,
            hash,
            parent_hash: block.header.parent_hash,
            state_root: block.header.state_root,
            extrinsics_root: block.header.extrinsics_root,
            logs: block.header.digest_logs,
            extrinsics: block
                .extrinsics
                .iter()
                .map(|x| format!("0x{}", hex::encode(x)))
                .collect(),
        }
    }
}

async fn load_block<C: ChainClient>(
    facade: &Facade<C>,
    hash: BlockHash,
) -> Result<BlockModel, ApiError> {
    let block = facade.block(hash).await.map_err(ApiError::upstream)?;
    Ok(BlockModel::new(hash, block))
}

#[derive(Debug, Default, Deserialize)]
pub struct HeadParams {
    pub finalized: Option<bool>,
}

async fn head_hash<C: ChainClient>(
    facade: &Facade<C>,
    params: &HeadParams,
) -> Result<BlockHash, ApiError> {
    if params.finalized.unwrap_or(true) {
        return facade.resolve(None).await;
    }

    let best = facade.header(None).await.map_err(ApiError::upstream)?;
    facade
        .block_hash(best.number)
        .await
        .map_err(ApiError::upstream)
}

pub async fn head<C: ChainClient>(
    State(facade): State<Facade<C>>,
    ApiQuery(params): ApiQuery<HeadParams>,
) -> Result<SanitizedJson<BlockModel>, ApiError> {
    let hash = head_hash(&facade, &params).await?;
    Ok(SanitizedJson(load_block(&facade, hash).await?))
}

pub async fn head_header<C: ChainClient>(
    State(facade): State<Facade<C>>,
    ApiQuery(params): ApiQuery<HeadParams>,
) -> Result<SanitizedJson<HeaderModel>, ApiError> {
    let hash = head_hash(&facade, &params).await?;
    let header = facade.header(Some(hash)).await.map_err(ApiError::upstream)?;

    Ok(SanitizedJson(header.into()))
}

pub async fn by_number<C: ChainClient>(
    State(facade): State<Facade<C>>,
    ApiPath(number): ApiPath<String>,
) -> Result<SanitizedJson<BlockModel>, ApiError> {
    let hash = facade.resolve(Some(&number)).await?;
    Ok(SanitizedJson(load_block(&facade, hash).await?))
}

pub async fn by_number_header<C: ChainClient>(
    State(facade): State<Facade<C>>,
    ApiPath(number): ApiPath<String>,
) -> Result<SanitizedJson<HeaderModel>, ApiError> {
    let hash = facade.resolve(Some(&number)).await?;
    let header = facade.header(Some(hash)).await.map_err(ApiError::upstream)?;

    Ok(SanitizedJson(header.into()))
}

#[derive(Debug, Default, Deserialize)]
pub struct RangeParams {
    pub range: Option<String>,
}

pub async fn by_range<C: ChainClient>(
    State(facade): State<Facade<C>>,
    ApiQuery(params): ApiQuery<RangeParams>,
) -> Result<SanitizedJson<Vec<BlockModel>>, ApiError> {
    let range = BlockRange::parse(params.range.as_deref(), facade.config.max_block_range())?;

    let blocks = try_join_all(range.heights().map(|height| {
        let facade = &facade;
        async move {
            let hash = facade.resolve(Some(&height.to_string())).await?;
            load_block(facade, hash).await
        }
    }))
    .await?;

    Ok(SanitizedJson(blocks))
}

pub struct BlocksController;

impl<C: ChainClient> Controller<C> for BlocksController {
    fn base_path(&self) -> &'static str {
        "/blocks"
    }

    fn routes(&self) -> Routes<Facade<C>> {
        vec![
            ("", get(by_range::<C>)),
            ("/head", get(head::<C>)),
            ("/head/header", get(head_header::<C>)),
            ("/{number}", get(by_number::<C>)),
            ("/{number}/header", get(by_number_header::<C>)),
        ]
    }
}
