use blockgate_core::ChainClient;

use crate::controller::Controller;

pub mod blocks;
pub mod node;
pub mod pallets;
pub mod root;
pub mod runtime;
pub mod staking_info;
pub mod transaction;

pub fn controllers<C: ChainClient>() -> Vec<&'static dyn Controller<C>> {
    vec![
        &root::RootController,
        &blocks::BlocksController,
        &runtime::RuntimeController,
        &node::NodeController,
        &pallets::PalletsController,
        &staking_info::StakingInfoController,
        &transaction::TransactionController,
    ]
}
