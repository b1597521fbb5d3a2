use chrono::{TimeZone, Utc};

use crate::{
    db_types::{BuyerId, BuyerOrder, Contract, ItemOption, Listing, OrderItem, PaymentOutput, PaymentTerms, Satoshis},
    traits::AddressExtractor,
};

/// Treats the output script as the UTF-8 text of the address it pays to. An empty or non-UTF-8 script has no address.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextAddresses;

impl AddressExtractor for PlainTextAddresses {
    fn extract_addresses(&self, script: &[u8]) -> Vec<String> {
        match std::str::from_utf8(script) {
            Ok(s) if !s.is_empty() => vec![s.to_string()],
            _ => Vec::new(),
        }
    }
}

/// An output paying `value` to `address`, for use with [`PlainTextAddresses`].
pub fn pay(address: &str, index: u32, value: i64) -> PaymentOutput {
    PaymentOutput::new(index, Satoshis::from(value), address.as_bytes().to_vec())
}

pub fn item(slug: &str, quantity: i64, options: &[(&str, &str)]) -> OrderItem {
    OrderItem {
        listing_slug: slug.to_string(),
        quantity,
        options: options.iter().map(|(n, v)| ItemOption { name: n.to_string(), value: v.to_string() }).collect(),
    }
}

pub fn shirt(color: &str, size: &str, quantity: i64) -> OrderItem {
    item("shirt", quantity, &[("color", color), ("size", size)])
}

/// A well-formed contract paying `amount` into `address`. The content is fixed, so two calls with the same arguments
/// produce the same order id.
pub fn sale_contract(address: &str, amount: i64, items: Vec<OrderItem>) -> Contract {
    Contract {
        vendor_listings: vec![Listing {
            slug: "shirt".into(),
            title: "Plain cotton shirt".into(),
            images: vec!["zb2rhThumbnail".into()],
        }],
        buyer_order: Some(BuyerOrder {
            buyer_id: Some(BuyerId { guid: "QmBuyerGuid".into(), blockchain_id: "@buyer".into() }),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).unwrap(),
            items,
            payment: Some(PaymentTerms { address: address.to_string(), amount: Satoshis::from(amount) }),
        }),
    }
}
