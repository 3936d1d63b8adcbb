use clap::ValueEnum;
use serde::Serialize;

/// Character size as given on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ValueEnum)]
pub enum DataBits {
    #[value(name = "5")]
    Five,
    #[value(name = "6")]
    Six,
    #[value(name = "7")]
    Seven,
    #[value(name = "8")]
    Eight,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ValueEnum)]
pub enum Parity {
    None,
    Odd,
    Even,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ValueEnum)]
pub enum StopBits {
    #[value(name = "1")]
    One,
    #[value(name = "2")]
    Two,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ValueEnum)]
pub enum FlowControl {
    None,
    Software,
    Hardware,
}

/// Which port to open and the line settings to force on it. Settings left
/// as `None` keep whatever the OS currently has for the device.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PortParameters {
    pub port_name: String,
    pub baud_rate: Option<usize>,
    pub data_bits: Option<DataBits>,
    pub parity: Option<Parity>,
    pub stop_bits: Option<StopBits>,
    pub flow_control: Option<FlowControl>,
}

impl PortParameters {
    pub fn new(port_name: &str) -> PortParameters {
        PortParameters {
            port_name: port_name.to_string(),
            ..Default::default()
        }
    }

    /// True if at least one line setting has to be applied after opening.
    pub fn changes_settings(&self) -> bool {
        self.baud_rate.is_some()
            || self.data_bits.is_some()
            || self.parity.is_some()
            || self.stop_bits.is_some()
            || self.flow_control.is_some()
    }
}

pub fn decode_char_size(data_bits: DataBits) -> serial::CharSize {
    match data_bits {
        DataBits::Five => serial::Bits5,
        DataBits::Six => serial::Bits6,
        DataBits::Seven => serial::Bits7,
        DataBits::Eight => serial::Bits8,
    }
}

pub fn decode_parity(parity: Parity) -> serial::Parity {
    match parity {
        Parity::None => serial::ParityNone,
        Parity::Odd => serial::ParityOdd,
        Parity::Even => serial::ParityEven,
    }
}

pub fn decode_stop_bits(stop_bits: StopBits) -> serial::StopBits {
    match stop_bits {
        StopBits::One => serial::Stop1,
        StopBits::Two => serial::Stop2,
    }
}

pub fn decode_flow_control(flow_control: FlowControl) -> serial::FlowControl {
    match flow_control {
        FlowControl::None => serial::FlowNone,
        FlowControl::Software => serial::FlowSoftware,
        FlowControl::Hardware => serial::FlowHardware,
    }
}
