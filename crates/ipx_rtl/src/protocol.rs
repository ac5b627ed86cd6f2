//! Bus protocols and the signals a crossbar port carries.

/// Width class of a protocol signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalWidth {
    /// A single wire.
    Bit,
    /// `AddrWidth` bits.
    Address,
    /// `DataWidth` bits.
    Data,
    /// `DataWidth / 8` bits.
    Strobe,
    /// The port's ID width.
    Id,
    /// `UserWidth` bits.
    User,
    /// A fixed number of bits.
    Fixed(u32),
}

/// One signal of a bus port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signal {
    /// Lowercase signal name, matching logical port names case-insensitively.
    pub name: &'static str,
    /// Whether the initiator drives the signal.
    pub from_initiator: bool,
    /// Bit width class.
    pub width: SignalWidth,
}

const fn sig(name: &'static str, from_initiator: bool, width: SignalWidth) -> Signal {
    Signal {
        name,
        from_initiator,
        width,
    }
}

use SignalWidth::{Address, Bit, Data, Fixed, Id, Strobe, User};

const AXI4_SIGNALS: &[Signal] = &[
    sig("awid", true, Id),
    sig("awaddr", true, Address),
    sig("awlen", true, Fixed(8)),
    sig("awsize", true, Fixed(3)),
    sig("awburst", true, Fixed(2)),
    sig("awlock", true, Bit),
    sig("awcache", true, Fixed(4)),
    sig("awprot", true, Fixed(3)),
    sig("awqos", true, Fixed(4)),
    sig("awregion", true, Fixed(4)),
    sig("awuser", true, User),
    sig("awvalid", true, Bit),
    sig("awready", false, Bit),
    sig("wdata", true, Data),
    sig("wstrb", true, Strobe),
    sig("wlast", true, Bit),
    sig("wuser", true, User),
    sig("wvalid", true, Bit),
    sig("wready", false, Bit),
    sig("bid", false, Id),
    sig("bresp", false, Fixed(2)),
    sig("buser", false, User),
    sig("bvalid", false, Bit),
    sig("bready", true, Bit),
    sig("arid", true, Id),
    sig("araddr", true, Address),
    sig("arlen", true, Fixed(8)),
    sig("arsize", true, Fixed(3)),
    sig("arburst", true, Fixed(2)),
    sig("arlock", true, Bit),
    sig("arcache", true, Fixed(4)),
    sig("arprot", true, Fixed(3)),
    sig("arqos", true, Fixed(4)),
    sig("arregion", true, Fixed(4)),
    sig("aruser", true, User),
    sig("arvalid", true, Bit),
    sig("arready", false, Bit),
    sig("rid", false, Id),
    sig("rdata", false, Data),
    sig("rresp", false, Fixed(2)),
    sig("rlast", false, Bit),
    sig("ruser", false, User),
    sig("rvalid", false, Bit),
    sig("rready", true, Bit),
];

const AXI4_LITE_SIGNALS: &[Signal] = &[
    sig("awaddr", true, Address),
    sig("awprot", true, Fixed(3)),
    sig("awvalid", true, Bit),
    sig("awready", false, Bit),
    sig("wdata", true, Data),
    sig("wstrb", true, Strobe),
    sig("wvalid", true, Bit),
    sig("wready", false, Bit),
    sig("bresp", false, Fixed(2)),
    sig("bvalid", false, Bit),
    sig("bready", true, Bit),
    sig("araddr", true, Address),
    sig("arprot", true, Fixed(3)),
    sig("arvalid", true, Bit),
    sig("arready", false, Bit),
    sig("rdata", false, Data),
    sig("rresp", false, Fixed(2)),
    sig("rvalid", false, Bit),
    sig("rready", true, Bit),
];

/// A bus protocol the crossbar can be emitted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// AMBA AXI4.
    Axi4,
    /// AMBA AXI4-Lite.
    Axi4Lite,
}

impl Protocol {
    /// Picks the protocol for a bus type name; unknown names fall back to AXI4.
    pub fn from_bus_type(bus_type: &str) -> Self {
        let normalized: String = bus_type
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        if normalized.contains("lite") {
            Protocol::Axi4Lite
        } else {
            Protocol::Axi4
        }
    }

    /// Returns the signals of one port, in declaration order.
    pub fn signals(self) -> &'static [Signal] {
        match self {
            Protocol::Axi4 => AXI4_SIGNALS,
            Protocol::Axi4Lite => AXI4_LITE_SIGNALS,
        }
    }

    /// Looks up a signal by logical port name, ignoring case.
    pub fn signal(self, logical_name: &str) -> Option<&'static Signal> {
        let lower = logical_name.to_ascii_lowercase();
        self.signals().iter().find(|s| s.name == lower)
    }

    /// Name of the crossbar module instantiated for this protocol.
    pub fn crossbar_module(self) -> &'static str {
        match self {
            Protocol::Axi4 => "axi_xbar_flat",
            Protocol::Axi4Lite => "axi_lite_xbar_flat",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_selection() {
        assert_eq!(Protocol::from_bus_type("axi4"), Protocol::Axi4);
        assert_eq!(Protocol::from_bus_type("AXI4-Lite"), Protocol::Axi4Lite);
        assert_eq!(Protocol::from_bus_type("axi4lite"), Protocol::Axi4Lite);
        assert_eq!(Protocol::from_bus_type("wishbone"), Protocol::Axi4);
    }

    #[test]
    fn lookups_ignore_case() {
        let awaddr = Protocol::Axi4.signal("AWADDR").unwrap();
        assert!(awaddr.from_initiator);
        assert_eq!(awaddr.width, SignalWidth::Address);
        assert!(!Protocol::Axi4.signal("rdata").unwrap().from_initiator);
        assert!(Protocol::Axi4Lite.signal("awid").is_none());
        assert!(Protocol::Axi4Lite.signal("PCLK").is_none());
    }

    #[test]
    fn every_channel_has_handshake() {
        for protocol in [Protocol::Axi4, Protocol::Axi4Lite] {
            for channel in ["aw", "w", "b", "ar", "r"] {
                assert!(protocol.signal(&format!("{channel}valid")).is_some());
                assert!(protocol.signal(&format!("{channel}ready")).is_some());
            }
        }
    }
}
