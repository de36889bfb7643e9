// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Tests and sample usage for `VniMap`

#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use crate::VniMapError;
    use crate::map::VniMapWriter;
    use net::trill::vnt::Vni;

    /// Sample per-network data: the set of ports flooding within the
    /// network.
    #[derive(Debug, Clone, PartialEq, Eq)]
    struct FloodPorts(Vec<u32>);

    #[test]
    fn add_lookup_del() {
        let mut writer: VniMapWriter<FloodPorts> = VniMapWriter::new();
        let reader = writer.get_reader();
        let vni = Vni::new(3000).unwrap();

        // add entry and look it up
        writer.add(vni, FloodPorts(vec![1, 2]), true).unwrap();
        assert_eq!(reader.get(vni), Some(FloodPorts(vec![1, 2])));

        // attempt insertion with duplicate vni
        assert_eq!(
            writer.add(vni, FloodPorts(vec![3]), true),
            Err(VniMapError::EntryExists(vni))
        );

        // lookup entry for non-existent vni
        assert_eq!(reader.get(Vni::new(4000).unwrap()), None);

        // deletion
        writer.del(vni, true);
        assert_eq!(reader.get(vni), None);
    }

    #[test]
    fn unpublished_changes_are_invisible() {
        let mut writer: VniMapWriter<FloodPorts> = VniMapWriter::new();
        let reader = writer.get_reader();
        let vni = Vni::new(42).unwrap();

        writer.add(vni, FloodPorts(vec![9]), false).unwrap();
        assert_eq!(reader.get(vni), None);

        writer.publish();
        assert_eq!(reader.get(vni), Some(FloodPorts(vec![9])));
    }

    #[test]
    fn delete_frees_the_key_for_reuse() {
        let mut writer: VniMapWriter<FloodPorts> = VniMapWriter::new();
        let reader = writer.get_reader();
        let vni = Vni::new(77).unwrap();

        writer.add(vni, FloodPorts(vec![1]), true).unwrap();
        writer.del(vni, true);
        writer.add(vni, FloodPorts(vec![2]), true).unwrap();
        assert_eq!(reader.get(vni), Some(FloodPorts(vec![2])));
    }
}
