use trackgate_model::LocationReport;

/// One entry in the packet-builder/command-mapper registry (Design Notes:
/// "tabularize the per-protocol encoder" instead of hand-coded branches).
/// GT06 is the only implementation today; the registry seam is what lets a
/// second tracker family be added without touching `OutputProcessor`.
pub trait OutputProtocol: Send + Sync {
    fn name(&self) -> &'static str;

    fn build_location_packet(&self, report: &LocationReport, serial: u16) -> Vec<u8>;

    /// Human-readable rendering for logs: hex for binary protocols.
    fn render_log(&self, packet: &[u8]) -> String {
        packet.iter().map(|b| format!("{b:02x}")).collect()
    }
}

/// GT06 output protocol. `location_protocol_number` selects which of the
/// 0x12/0x22/0x32/0xA0 location variants is built, per configuration.
pub struct Gt06Protocol {
    location_protocol_number: u8,
}

impl Gt06Protocol {
    /// Returns `None` if `location_protocol_number` is not one of the four
    /// known location variants.
    pub fn new(location_protocol_number: u8) -> Option<Self> {
        trackgate_gt06::LOCATION_PROTOCOLS
            .contains(&location_protocol_number)
            .then_some(Self { location_protocol_number })
    }
}

impl OutputProtocol for Gt06Protocol {
    fn name(&self) -> &'static str {
        "gt06"
    }

    fn build_location_packet(&self, report: &LocationReport, serial: u16) -> Vec<u8> {
        trackgate_gt06::build_location_packet(report, self.location_protocol_number, serial)
            .expect("location_protocol_number validated at construction")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_protocol_numbers_at_construction() {
        assert!(Gt06Protocol::new(0x99).is_none());
    }

    #[test]
    fn accepts_every_documented_variant() {
        for proto in trackgate_gt06::LOCATION_PROTOCOLS {
            assert!(Gt06Protocol::new(proto).is_some());
        }
    }
}
