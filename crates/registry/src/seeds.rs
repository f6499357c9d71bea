//! Well-known public deployments.

use crate::{
    chains::{
        ChildChain,
        EthBridge,
        ParentChain,
        TokenBridge,
    },
    registry::ChainRegistry,
    ARBITRUM_ONE,
    ARBITRUM_RINKEBY,
    ETHEREUM_MAINNET,
    RETRYABLE_LIFETIME_SECONDS,
    RINKEBY,
};
use hopper_types::Address;

/// Parse a hard-coded address literal. Only for the constants below;
/// a failure is a defect in this file, not a runtime condition.
fn addr(s: &str) -> Address {
    s.parse().expect("well-known address literal")
}

fn mainnet_eth_bridge() -> EthBridge {
    EthBridge {
        bridge: addr("0x011b6e24ffb0b5f5fcc564cf4183c5bbbc96d515"),
        inbox: addr("0x4Dbd4fc535Ac27206064B68FfCf827b0A60BAB3f"),
        sequencer_inbox: addr("0x4c6f947Ae67F572afa4ae0730947DE7C874F95Ef"),
        rollup: addr("0xC12BA48c781F6e392B49Db2E25Cd0c28cD77531A"),
        outbox: addr("0x0b9857ae2d4a3dbe74ffe1d7df045bb7f96e4840"),
        classic_outboxes: vec![
            (addr("0x667e23ABd27E623c11d4CC00ca3EC4d0bD63337a"), 0),
            (addr("0x760723CD2e632826c38Fef8CD438A4CC7E7E1A40"), 30),
        ],
    }
}

fn mainnet_token_bridge() -> TokenBridge {
    TokenBridge {
        parent_gateway_router: addr("0x72Ce9c846789fdB6fC1f34aC4AD25Dd9ef7031ef"),
        child_gateway_router: addr("0x5288c571Fd7aD117beA99bF60FE0846C4E84F933"),
        parent_erc20_gateway: addr("0xa3A7B6F88361F48403514059F1F16C8E78d60EeC"),
        child_erc20_gateway: addr("0x09e9222E96E7B4AE2a407B98d48e330053351EEe"),
        parent_custom_gateway: addr("0xcEe284F754E854890e311e3280b767F80797180d"),
        child_custom_gateway: addr("0x096760F208390250649E3e8763348E783AEF5562"),
        parent_weth_gateway: addr("0xd92023E9d9911199a6711321D1277285e6d4e2db"),
        child_weth_gateway: addr("0x6c411aD3E74De3E7Bd422b94A27770f5B86C623B"),
        parent_weth: addr("0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2"),
        child_weth: addr("0x82aF49447D8a07e3bd95BD0d56f35241523fBab1"),
    }
}

fn rinkeby_eth_bridge() -> EthBridge {
    EthBridge {
        bridge: addr("0x9a28e783c47bbeb813f32b861a431d0776681e95"),
        inbox: addr("0x578BAde599406A8fE3d24Fd7f7211c0911F5B29e"),
        sequencer_inbox: addr("0xe1ae39e91c5505f7f0ffc9e2bbf1f6e1122dcfa8"),
        rollup: addr("0xFe2c86CF40F89Fe2F726cFBBACEBae631300b50c"),
        outbox: addr("0x2360A33905dc1c72b12d975d975F42BaBdcef9F3"),
        classic_outboxes: vec![
            (addr("0xefa1a42D3c4699822eE42677515A64b658be1bFc"), 0),
            (addr("0x2360A33905dc1c72b12d975d975F42BaBdcef9F3"), 326),
        ],
    }
}

fn rinkeby_token_bridge() -> TokenBridge {
    TokenBridge {
        parent_gateway_router: addr("0x70C143928eCfFaf9F5b406f7f4fC28Dc43d68380"),
        child_gateway_router: addr("0x9413AD42910c1eA60c737dB5f58d1C504498a3cD"),
        parent_erc20_gateway: addr("0x91169Dbb45e6804743F94609De50D511C437572E"),
        child_erc20_gateway: addr("0x195C107F3F75c4C93Eba7d9a1312F19305d6375f"),
        parent_custom_gateway: addr("0x917dc9a69F65dC3082D518192cd3725E1Fa96cA2"),
        child_custom_gateway: addr("0x9b014455AcC2Fe90c52803849d0002aeEC184a06"),
        parent_weth_gateway: addr("0x81d1a19cf7071732D4313c75dE8DD5b8CF697eFD"),
        child_weth_gateway: addr("0xf94bc045c4E926CC0b34e8D1c41Cd7a043304ac9"),
        parent_weth: addr("0xc778417E063141139Fce010982780140Aa0cD5Ab"),
        child_weth: addr("0xB47e6A5f8b33b3F17603C83a0535A9dcD7E32681"),
    }
}

impl ChainRegistry {
    /// A registry pre-populated with the public deployments: the Ethereum
    /// mainnet / Arbitrum One pair and the Rinkeby testnet pair.
    /// Teleporter contracts are not part of the public seed set; chains
    /// that host them are registered as custom chains.
    pub fn with_public_networks() -> Self {
        let registry = Self::new();

        let seeds = [
            (
                ParentChain {
                    chain_id: ETHEREUM_MAINNET,
                    name: "Mainnet".into(),
                    block_time_seconds: 14,
                    child_chain_ids: vec![],
                    is_custom: false,
                },
                ChildChain {
                    chain_id: ARBITRUM_ONE,
                    name: "Arbitrum One".into(),
                    parent_chain_id: ETHEREUM_MAINNET,
                    eth_bridge: mainnet_eth_bridge(),
                    token_bridge: mainnet_token_bridge(),
                    teleporter: None,
                    confirm_period_blocks: 45818,
                    retryable_lifetime_seconds: RETRYABLE_LIFETIME_SECONDS,
                    is_custom: false,
                },
            ),
            (
                ParentChain {
                    chain_id: RINKEBY,
                    name: "Rinkeby".into(),
                    block_time_seconds: 15,
                    child_chain_ids: vec![],
                    is_custom: false,
                },
                ChildChain {
                    chain_id: ARBITRUM_RINKEBY,
                    name: "Arbitrum Rinkeby".into(),
                    parent_chain_id: RINKEBY,
                    eth_bridge: rinkeby_eth_bridge(),
                    token_bridge: rinkeby_token_bridge(),
                    teleporter: None,
                    confirm_period_blocks: 6545,
                    retryable_lifetime_seconds: RETRYABLE_LIFETIME_SECONDS,
                    is_custom: false,
                },
            ),
        ];

        for (parent, child) in seeds {
            // Freshly constructed registry, no ids can collide.
            registry
                .register_parent_chain(parent, false)
                .expect("empty registry accepts seed parents");
            registry
                .register_child_chain(child, false)
                .expect("empty registry accepts seed children");
        }
        registry
    }
}
