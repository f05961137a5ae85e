use std::fmt::{Display, Debug, Formatter, Result};


/// Error set for potential status get or set errors
pub enum StatusError {
    /// Parameter name is not recognized by the node model
    UnknownParameter(String),
    /// Parameter is scalar but an array value was given
    ExpectedScalarValue(String),
    /// Parameter is an array but a scalar value was given
    ExpectedArrayValue(String),
    /// Array parameter has a fixed length that the given value does not match
    ArrayLengthMismatch {
        /// Parameter being set
        parameter: String,
        /// Length the node model expects
        expected: usize,
        /// Length of the given value
        found: usize,
    },
    /// Node index does not fall within any created node group
    NodeNotFound,
    /// Spike times must be strictly positive
    NonPositiveSpikeTime,
}

impl Display for StatusError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            StatusError::UnknownParameter(name) =>
                write!(f, "Unknown parameter: {}", name),
            StatusError::ExpectedScalarValue(name) =>
                write!(f, "Parameter {} takes a scalar value", name),
            StatusError::ExpectedArrayValue(name) =>
                write!(f, "Parameter {} takes an array value", name),
            StatusError::ArrayLengthMismatch { parameter, expected, found } =>
                write!(f, "Parameter {} takes {} values but {} were given", parameter, expected, found),
            StatusError::NodeNotFound =>
                write!(f, "Node index not found in any node group"),
            StatusError::NonPositiveSpikeTime =>
                write!(f, "Spike times must be positive"),
        }
    }
}

impl Debug for StatusError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "file: {}, line: {}, error: {}", file!(), line!(), self)
    }
}

/// Error set for potential connection errors
pub enum ConnectError {
    /// Source node index cannot be found
    SourceNotFound,
    /// Target node index cannot be found
    TargetNotFound,
    /// Receptor port is not below the target group's receptor port count
    ReceptorPortOutOfRange,
    /// Connection delay is below the simulation time resolution
    DelayBelowResolution,
    /// One to one connections require source and target ranges of equal size
    SourceTargetSizeMismatch,
    /// Connection rule parameter must be a positive count
    RuleParameterOutOfRange,
}

impl Display for ConnectError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        let err_msg = match self {
            ConnectError::SourceNotFound => "Source node not found",
            ConnectError::TargetNotFound => "Target node not found",
            ConnectError::ReceptorPortOutOfRange => "Receptor port out of range for target group",
            ConnectError::DelayBelowResolution => "Connection delay must be at least the time resolution",
            ConnectError::SourceTargetSizeMismatch => "One to one connections require equally sized source and target ranges",
            ConnectError::RuleParameterOutOfRange => "Connection rule parameter out of range",
        };

        write!(f, "{}", err_msg)
    }
}

impl Debug for ConnectError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "file: {}, line: {}, error: {}", file!(), line!(), self)
    }
}

/// Error set for potential recording errors
pub enum RecordError {
    /// Node index does not fall within any created node group
    NodeNotFound,
    /// Variable name is not recordable from the node model
    UnknownVariable(String),
    /// Receptor port is not below the node group's receptor port count
    PortOutOfRange,
    /// Variable, node, and port arrays must have the same length
    MismatchedRecordArrays,
    /// Record id does not refer to a created record
    RecordNotFound,
    /// Spike time recording was not activated for the node
    SpikeRecordingNotActivated,
}

impl Display for RecordError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            RecordError::NodeNotFound =>
                write!(f, "Node index not found in any node group"),
            RecordError::UnknownVariable(name) =>
                write!(f, "Unknown recordable variable: {}", name),
            RecordError::PortOutOfRange =>
                write!(f, "Receptor port out of range for recorded node"),
            RecordError::MismatchedRecordArrays =>
                write!(f, "Variable, node, and port arrays must have the same length"),
            RecordError::RecordNotFound =>
                write!(f, "Record id not found"),
            RecordError::SpikeRecordingNotActivated =>
                write!(f, "Spike time recording not activated for node"),
        }
    }
}

impl Debug for RecordError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "file: {}, line: {}, error: {}", file!(), line!(), self)
    }
}

/// Error set for potential simulation and setup errors
pub enum SimulationError {
    /// Model name is not recognized
    UnknownModel(String),
    /// Node groups must contain at least one node
    EmptyNodeGroup,
    /// Time resolution must be a positive number of milliseconds
    InvalidTimeResolution,
    /// Operation must happen before the network is calibrated
    AlreadyCalibrated,
    /// Simulation time must cover at least one time step
    InvalidSimulationTime,
    /// File could not be opened for writing records
    RecordFileUnwritable(String),
}

impl Display for SimulationError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            SimulationError::UnknownModel(name) =>
                write!(f, "Unknown model name: {}", name),
            SimulationError::EmptyNodeGroup =>
                write!(f, "Node groups must contain at least one node"),
            SimulationError::InvalidTimeResolution =>
                write!(f, "Time resolution must be positive"),
            SimulationError::AlreadyCalibrated =>
                write!(f, "Operation must happen before calibration"),
            SimulationError::InvalidSimulationTime =>
                write!(f, "Simulation time must cover at least one time step"),
            SimulationError::RecordFileUnwritable(name) =>
                write!(f, "Could not open record file for writing: {}", name),
        }
    }
}

impl Debug for SimulationError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "file: {}, line: {}, error: {}", file!(), line!(), self)
    }
}

/// A set of errors that may occur when using the library
pub enum SpikingNetworkEngineError {
    /// Errors related to getting or setting node status
    StatusRelatedError(StatusError),
    /// Errors related to building connections
    ConnectRelatedError(ConnectError),
    /// Errors related to recording
    RecordRelatedError(RecordError),
    /// Errors related to simulation setup and stepping
    SimulationRelatedError(SimulationError),
}

impl Display for SpikingNetworkEngineError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            SpikingNetworkEngineError::StatusRelatedError(err) => write!(f, "{}", err),
            SpikingNetworkEngineError::ConnectRelatedError(err) => write!(f, "{}", err),
            SpikingNetworkEngineError::RecordRelatedError(err) => write!(f, "{}", err),
            SpikingNetworkEngineError::SimulationRelatedError(err) => write!(f, "{}", err),
        }
    }
}

impl Debug for SpikingNetworkEngineError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "file: {}, line: {}, error: {}", file!(), line!(), self)
    }
}

impl From<StatusError> for SpikingNetworkEngineError {
    fn from(err: StatusError) -> SpikingNetworkEngineError {
        SpikingNetworkEngineError::StatusRelatedError(err)
    }
}

impl From<ConnectError> for SpikingNetworkEngineError {
    fn from(err: ConnectError) -> SpikingNetworkEngineError {
        SpikingNetworkEngineError::ConnectRelatedError(err)
    }
}

impl From<RecordError> for SpikingNetworkEngineError {
    fn from(err: RecordError) -> SpikingNetworkEngineError {
        SpikingNetworkEngineError::RecordRelatedError(err)
    }
}

impl From<SimulationError> for SpikingNetworkEngineError {
    fn from(err: SimulationError) -> SpikingNetworkEngineError {
        SpikingNetworkEngineError::SimulationRelatedError(err)
    }
}
