/// Internal display status paired with Shopify's snake_case shipment status.
pub const STATUS_TABLE: &[(&str, &str)] = &[
    ("LabelPrinted", "label_printed"),
    ("LabelPurchased", "label_purchased"),
    ("AttemptedDelivery", "attempted_delivery"),
    ("ReadyForPickup", "ready_for_pickup"),
    ("Confirmed", "confirmed"),
    ("InTransit", "in_transit"),
    ("OutForDelivery", "out_for_delivery"),
    ("Delivered", "delivered"),
    ("Failure", "failure"),
];

/// Status given to orders that carry no shipment information yet.
pub const DEFAULT_STATUS: &str = "New";

pub fn from_shopify(shipment_status: &str) -> Option<&'static str> {
    STATUS_TABLE
        .iter()
        .find(|(_, external)| *external == shipment_status)
        .map(|(internal, _)| *internal)
}

pub fn to_shopify(status: &str) -> Option<&'static str> {
    STATUS_TABLE
        .iter()
        .find(|(internal, _)| *internal == status)
        .map(|(_, external)| *external)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_shipment_status_both_ways() {
        assert_eq!(from_shopify("in_transit"), Some("InTransit"));
        assert_eq!(from_shopify("label_purchased"), Some("LabelPurchased"));
        assert_eq!(to_shopify("Delivered"), Some("delivered"));
        assert_eq!(from_shopify("teleported"), None);
    }

    #[test]
    fn table_round_trips() {
        for (internal, external) in STATUS_TABLE {
            assert_eq!(from_shopify(external), Some(*internal));
            assert_eq!(to_shopify(internal), Some(*external));
        }
    }
}
