//! Strong identifier types naming remote targets.

use wirepack::Codec;
use wirepack::impl_codec_struct;

/// Strong type for service instance identifiers.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct InstanceId(pub u32);

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "instance-{}", self.0)
    }
}

/// Strong type for exported function identifiers, dense from 0 per service.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct FunctionId(pub u32);

impl std::fmt::Display for FunctionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "fn-{}", self.0)
    }
}

impl Codec for InstanceId {
    fn encode(&self, out: &mut [u8]) -> wirepack::Result<usize> {
        self.0.encode(out)
    }

    fn decode(input: &[u8]) -> wirepack::Result<(Self, usize)> {
        let (raw, n) = u32::decode(input)?;
        Ok((Self(raw), n))
    }
}

impl Codec for FunctionId {
    fn encode(&self, out: &mut [u8]) -> wirepack::Result<usize> {
        self.0.encode(out)
    }

    fn decode(input: &[u8]) -> wirepack::Result<(Self, usize)> {
        let (raw, n) = u32::decode(input)?;
        Ok((Self(raw), n))
    }
}

/// The immutable `(instance, function)` pair a call is addressed to.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub struct CallIdentifier {
    instance_id: InstanceId,
    function_id: FunctionId,
}

impl_codec_struct!(CallIdentifier { instance_id, function_id });

impl CallIdentifier {
    pub fn new(instance_id: InstanceId, function_id: FunctionId) -> Self {
        Self { instance_id, function_id }
    }

    pub fn instance_id(&self) -> InstanceId {
        self.instance_id
    }

    pub fn function_id(&self) -> FunctionId {
        self.function_id
    }
}

impl std::fmt::Display for CallIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.instance_id, self.function_id)
    }
}
