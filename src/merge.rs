//! Expanding read requests into parameter skeletons.

use tracing::debug;

use crate::parameter::{Parameter, ParameterCatalog, ReadRequest};

/// Builds one unread parameter per address of `request`, in ascending order.
///
/// Documented addresses reuse the catalog entry with its value fields cleared.
/// Undocumented addresses get a bare [`Parameter`] with an identity transform,
/// so the backup still covers every requested address.
///
/// # Example
///
/// ```
/// use bigdecimal::BigDecimal;
/// use modbus_sync::{merge, Parameter, ParameterCatalog, ParameterType, ReadRequest};
///
/// let catalog = ParameterCatalog::from_parameters(vec![
///     Parameter::new(ParameterType::HoldingRegister, 4).with_identifier("P0400"),
/// ])
/// .unwrap();
/// let request = ReadRequest::new(ParameterType::HoldingRegister, 2, 5).unwrap();
///
/// let skeletons = merge(&catalog, &request);
/// let addresses: Vec<u16> = skeletons.iter().map(Parameter::address).collect();
/// assert_eq!(addresses, vec![2, 3, 4, 5, 6]);
/// assert_eq!(skeletons[2].identifier(), Some("P0400"));
/// assert_eq!(skeletons[0].identifier(), None);
/// ```
pub fn merge(catalog: &ParameterCatalog, request: &ReadRequest) -> Vec<Parameter> {
    let kind = request.kind();
    let mut documented = 0usize;
    let skeletons: Vec<Parameter> = request
        .addresses()
        .map(|address| match catalog.get(kind, address) {
            Some(parameter) => {
                documented += 1;
                parameter.cleared()
            }
            None => Parameter::new(kind, address),
        })
        .collect();

    debug!(
        request = %request,
        documented,
        synthesized = skeletons.len() - documented,
        "Merged request with catalog"
    );
    skeletons
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register::ParameterType;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    fn catalog() -> ParameterCatalog {
        ParameterCatalog::from_parameters(vec![
            Parameter::new(ParameterType::HoldingRegister, 4)
                .with_identifier("P0400")
                .with_scale(BigDecimal::from_str("0.5").unwrap())
                .with_raw_value(99)
                .unwrap(),
            Parameter::new(ParameterType::InputRegister, 3).with_identifier("P0003"),
        ])
        .unwrap()
    }

    #[test]
    fn test_one_skeleton_per_address() {
        let request = ReadRequest::new(ParameterType::HoldingRegister, 2, 5).unwrap();
        let skeletons = merge(&catalog(), &request);
        assert_eq!(skeletons.len(), 5);
        for (offset, parameter) in skeletons.iter().enumerate() {
            assert_eq!(parameter.address(), 2 + offset as u16);
            assert_eq!(parameter.kind(), ParameterType::HoldingRegister);
            assert_eq!(parameter.raw_value(), None);
        }
    }

    #[test]
    fn test_catalog_hit_is_cleared() {
        let request = ReadRequest::new(ParameterType::HoldingRegister, 4, 1).unwrap();
        let skeletons = merge(&catalog(), &request);
        assert_eq!(skeletons[0].identifier(), Some("P0400"));
        assert_eq!(skeletons[0].raw_value(), None);
        assert_eq!(skeletons[0].value(), None);
        assert_eq!(skeletons[0].scale(), Some(&BigDecimal::from_str("0.5").unwrap()));
    }

    #[test]
    fn test_miss_uses_identity() {
        let request = ReadRequest::new(ParameterType::HoldingRegister, 3, 1).unwrap();
        let skeleton = merge(&catalog(), &request).remove(0);
        assert_eq!(skeleton, Parameter::new(ParameterType::HoldingRegister, 3));
        let read = skeleton.with_raw_value(1234).unwrap();
        assert_eq!(read.value(), Some(&BigDecimal::from(1234)));
    }

    #[test]
    fn test_type_is_part_of_key() {
        let request = ReadRequest::new(ParameterType::HoldingRegister, 3, 1).unwrap();
        assert_eq!(merge(&catalog(), &request)[0].identifier(), None);

        let request = ReadRequest::new(ParameterType::InputRegister, 3, 1).unwrap();
        assert_eq!(merge(&catalog(), &request)[0].identifier(), Some("P0003"));
    }
}
