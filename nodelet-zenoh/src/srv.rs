//! Service definitions for the nodelet manager.
//!
//! These mirror the `nodelet_interfaces` package: `NodeletLoad` asks a
//! manager to instantiate a nodelet, `NodeletUnload` asks it to tear one
//! down. `SetParameters` mirrors `rcl_interfaces/srv/SetParameters`, the
//! standard parameter service a loaded nodelet answers on. Field order is
//! significant, CDR encodes structs positionally.

use crate::error::Result;
use crate::parameter::Value;
use crate::typesupport::{ServiceMsg, TypeSupport, cdr_deserialize, cdr_serialize};
use serde::{Deserialize, Serialize};

/// RIHS01 hash of the `NodeletLoad` service type.
const NODELET_LOAD_HASH: &str =
    "RIHS01_9c3bb12f78a59d26faa09ad7c05ac6b1f31d2c01b60cf0d24e1a3e01bfc42b88";

/// RIHS01 hash of the `NodeletUnload` service type.
const NODELET_UNLOAD_HASH: &str =
    "RIHS01_41d6f2a3e70ab9c2d5b103f5c871e9a04c2f6bd18e39ad07256c3c0f9ab1de64";

/// Request to load a nodelet into a manager.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeletLoadRequest {
    /// Fully qualified name the nodelet will run under.
    pub name: String,
    /// Plugin type to instantiate, e.g. `"pkg/Class"`.
    pub type_name: String,
    /// Remapping sources, index-aligned with `remap_target_args`.
    pub remap_source_args: Vec<String>,
    /// Remapping targets, index-aligned with `remap_source_args`.
    pub remap_target_args: Vec<String>,
}

/// Response from a load request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeletLoadResponse {
    /// Whether the manager instantiated the nodelet.
    pub success: bool,
}

/// The `NodeletLoad` service type.
#[derive(Debug)]
pub enum NodeletLoad {}

impl ServiceMsg for NodeletLoad {
    type Request = NodeletLoadRequest;
    type Response = NodeletLoadResponse;

    fn type_name() -> &'static str {
        "nodelet_interfaces::srv::dds_::NodeletLoad_"
    }

    fn type_hash() -> &'static str {
        NODELET_LOAD_HASH
    }
}

impl TypeSupport for NodeletLoadRequest {
    fn to_bytes(&self) -> Result<Vec<u8>> {
        cdr_serialize(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        cdr_deserialize(bytes)
    }

    fn type_name() -> &'static str {
        "nodelet_interfaces::srv::dds_::NodeletLoad_Request_"
    }

    fn type_hash() -> &'static str {
        NODELET_LOAD_HASH
    }
}

impl TypeSupport for NodeletLoadResponse {
    fn to_bytes(&self) -> Result<Vec<u8>> {
        cdr_serialize(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        cdr_deserialize(bytes)
    }

    fn type_name() -> &'static str {
        "nodelet_interfaces::srv::dds_::NodeletLoad_Response_"
    }

    fn type_hash() -> &'static str {
        NODELET_LOAD_HASH
    }
}

/// Request to unload a nodelet from a manager.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeletUnloadRequest {
    /// Fully qualified name of the nodelet to tear down.
    pub name: String,
}

/// Response from an unload request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeletUnloadResponse {
    /// Whether the manager removed the nodelet.
    pub success: bool,
}

/// The `NodeletUnload` service type.
#[derive(Debug)]
pub enum NodeletUnload {}

impl ServiceMsg for NodeletUnload {
    type Request = NodeletUnloadRequest;
    type Response = NodeletUnloadResponse;

    fn type_name() -> &'static str {
        "nodelet_interfaces::srv::dds_::NodeletUnload_"
    }

    fn type_hash() -> &'static str {
        NODELET_UNLOAD_HASH
    }
}

impl TypeSupport for NodeletUnloadRequest {
    fn to_bytes(&self) -> Result<Vec<u8>> {
        cdr_serialize(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        cdr_deserialize(bytes)
    }

    fn type_name() -> &'static str {
        "nodelet_interfaces::srv::dds_::NodeletUnload_Request_"
    }

    fn type_hash() -> &'static str {
        NODELET_UNLOAD_HASH
    }
}

impl TypeSupport for NodeletUnloadResponse {
    fn to_bytes(&self) -> Result<Vec<u8>> {
        cdr_serialize(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        cdr_deserialize(bytes)
    }

    fn type_name() -> &'static str {
        "nodelet_interfaces::srv::dds_::NodeletUnload_Response_"
    }

    fn type_hash() -> &'static str {
        NODELET_UNLOAD_HASH
    }
}

/// RIHS01 hash of the `rcl_interfaces/srv/SetParameters` service type,
/// as shipped with ROS2 Jazzy.
const SET_PARAMETERS_HASH: &str =
    "RIHS01_56eed9a67e169f9cb6c1f987bc88f868c14a8fc9f743a263bc734c154015d7e0";

/// Type codes from `rcl_interfaces/msg/ParameterType`.
pub mod parameter_type {
    /// No value set.
    pub const NOT_SET: u8 = 0;
    /// Boolean value.
    pub const BOOL: u8 = 1;
    /// 64-bit integer value.
    pub const INTEGER: u8 = 2;
    /// 64-bit float value.
    pub const DOUBLE: u8 = 3;
    /// String value.
    pub const STRING: u8 = 4;
    /// Byte array value.
    pub const BYTE_ARRAY: u8 = 5;
    /// Boolean array value.
    pub const BOOL_ARRAY: u8 = 6;
    /// Integer array value.
    pub const INTEGER_ARRAY: u8 = 7;
    /// Float array value.
    pub const DOUBLE_ARRAY: u8 = 8;
    /// String array value.
    pub const STRING_ARRAY: u8 = 9;
}

/// A typed parameter value, `rcl_interfaces/msg/ParameterValue`.
///
/// Only the field selected by `type` carries data; the rest stay at
/// their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterValue {
    /// Type code from [`parameter_type`].
    pub r#type: u8,
    /// Boolean payload.
    pub bool_value: bool,
    /// Integer payload.
    pub integer_value: i64,
    /// Float payload.
    pub double_value: f64,
    /// String payload.
    pub string_value: String,
    /// Byte array payload.
    pub byte_array_value: Vec<u8>,
    /// Boolean array payload.
    pub bool_array_value: Vec<bool>,
    /// Integer array payload.
    pub integer_array_value: Vec<i64>,
    /// Float array payload.
    pub double_array_value: Vec<f64>,
    /// String array payload.
    pub string_array_value: Vec<String>,
}

impl From<&Value> for ParameterValue {
    fn from(value: &Value) -> Self {
        let mut out = ParameterValue::default();
        match value {
            Value::Bool(b) => {
                out.r#type = parameter_type::BOOL;
                out.bool_value = *b;
            }
            Value::I64(i) => {
                out.r#type = parameter_type::INTEGER;
                out.integer_value = *i;
            }
            Value::F64(x) => {
                out.r#type = parameter_type::DOUBLE;
                out.double_value = *x;
            }
            Value::String(s) => {
                out.r#type = parameter_type::STRING;
                out.string_value = s.clone();
            }
            Value::BoolArray(v) => {
                out.r#type = parameter_type::BOOL_ARRAY;
                out.bool_array_value = v.clone();
            }
            Value::I64Array(v) => {
                out.r#type = parameter_type::INTEGER_ARRAY;
                out.integer_array_value = v.clone();
            }
            Value::F64Array(v) => {
                out.r#type = parameter_type::DOUBLE_ARRAY;
                out.double_array_value = v.clone();
            }
            Value::StringArray(v) => {
                out.r#type = parameter_type::STRING_ARRAY;
                out.string_array_value = v.clone();
            }
        }
        out
    }
}

/// A named parameter, `rcl_interfaces/msg/Parameter`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Parameter value.
    pub value: ParameterValue,
}

/// Request to set parameters on a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetParametersRequest {
    /// Parameters to set.
    pub parameters: Vec<Parameter>,
}

/// Per-parameter verdict, `rcl_interfaces/msg/SetParametersResult`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetParametersResult {
    /// Whether the parameter was accepted.
    pub successful: bool,
    /// Reason for rejection, empty on success.
    pub reason: String,
}

/// Response from a set-parameters request, one result per parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetParametersResponse {
    /// Results, index-aligned with the request's parameters.
    pub results: Vec<SetParametersResult>,
}

/// The `SetParameters` service type.
#[derive(Debug)]
pub enum SetParameters {}

impl ServiceMsg for SetParameters {
    type Request = SetParametersRequest;
    type Response = SetParametersResponse;

    fn type_name() -> &'static str {
        "rcl_interfaces::srv::dds_::SetParameters_"
    }

    fn type_hash() -> &'static str {
        SET_PARAMETERS_HASH
    }
}

impl TypeSupport for SetParametersRequest {
    fn to_bytes(&self) -> Result<Vec<u8>> {
        cdr_serialize(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        cdr_deserialize(bytes)
    }

    fn type_name() -> &'static str {
        "rcl_interfaces::srv::dds_::SetParameters_Request_"
    }

    fn type_hash() -> &'static str {
        SET_PARAMETERS_HASH
    }
}

impl TypeSupport for SetParametersResponse {
    fn to_bytes(&self) -> Result<Vec<u8>> {
        cdr_serialize(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        cdr_deserialize(bytes)
    }

    fn type_name() -> &'static str {
        "rcl_interfaces::srv::dds_::SetParameters_Response_"
    }

    fn type_hash() -> &'static str {
        SET_PARAMETERS_HASH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_request_roundtrip() {
        let req = NodeletLoadRequest {
            name: "/camera/rectify".to_string(),
            type_name: "image_proc/rectify".to_string(),
            remap_source_args: vec!["/camera/rectify/image".to_string()],
            remap_target_args: vec!["/camera/image_rect".to_string()],
        };
        let bytes = req.to_bytes().unwrap();
        let decoded = NodeletLoadRequest::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, req);
    }

    #[test]
    fn test_unload_response_roundtrip() {
        let resp = NodeletUnloadResponse { success: true };
        let bytes = resp.to_bytes().unwrap();
        let decoded = NodeletUnloadResponse::from_bytes(&bytes).unwrap();
        assert!(decoded.success);
    }

    #[test]
    fn test_parameter_value_from_store_value() {
        let pv = ParameterValue::from(&Value::I64(30));
        assert_eq!(pv.r#type, parameter_type::INTEGER);
        assert_eq!(pv.integer_value, 30);

        let pv = ParameterValue::from(&Value::String("base_link".to_string()));
        assert_eq!(pv.r#type, parameter_type::STRING);
        assert_eq!(pv.string_value, "base_link");

        let pv = ParameterValue::from(&Value::F64Array(vec![1.0, 2.5]));
        assert_eq!(pv.r#type, parameter_type::DOUBLE_ARRAY);
        assert_eq!(pv.double_array_value, vec![1.0, 2.5]);
    }

    #[test]
    fn test_set_parameters_roundtrip() {
        let req = SetParametersRequest {
            parameters: vec![Parameter {
                name: "rate".to_string(),
                value: ParameterValue::from(&Value::I64(30)),
            }],
        };
        let bytes = req.to_bytes().unwrap();
        let decoded = SetParametersRequest::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, req);

        let resp = SetParametersResponse {
            results: vec![SetParametersResult {
                successful: true,
                reason: String::new(),
            }],
        };
        let bytes = resp.to_bytes().unwrap();
        let decoded = SetParametersResponse::from_bytes(&bytes).unwrap();
        assert!(decoded.results[0].successful);
    }

    #[test]
    fn test_service_type_names() {
        assert_eq!(
            <NodeletLoad as ServiceMsg>::type_name(),
            "nodelet_interfaces::srv::dds_::NodeletLoad_"
        );
        assert_eq!(
            <NodeletUnload as ServiceMsg>::type_name(),
            "nodelet_interfaces::srv::dds_::NodeletUnload_"
        );
        assert!(<NodeletLoad as ServiceMsg>::type_hash().starts_with("RIHS01_"));
    }
}
