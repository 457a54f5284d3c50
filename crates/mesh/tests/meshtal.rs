//! Integration tests for reading meshtal files

use mctools_mesh::{
    mesh_index, next_mesh_start, read_meshtal, read_meshtal_target, ColumnLayout, Error, Group,
    MeshGrid,
};
use rstest::{fixture, rstest};

#[fixture]
fn photon_mesh() -> MeshGrid {
    read_meshtal_target("./data/fmesh_214.msht", 214).unwrap()
}

#[fixture]
fn time_mesh() -> MeshGrid {
    read_meshtal_target("./data/fmesh_314.msht", 314).unwrap()
}

#[rstest]
fn energy_layout(photon_mesh: MeshGrid) {
    assert_eq!(photon_mesh.id, 214);
    assert_eq!(photon_mesh.particle, "photon");
    assert_eq!(photon_mesh.layout, ColumnLayout::Energy);
    assert_eq!(photon_mesh.e_bounds, vec!["0.00E+00", "1.00E+36"]);
    assert!(photon_mesh.t_bounds.is_empty());

    assert_eq!(photon_mesh.voxels.len(), 1000);
    assert_eq!(photon_mesh.number_voxels(), 1000);
    assert_eq!(photon_mesh.x_bounds[1], -8.0);
    assert_eq!(photon_mesh.x_mids[2], -5.0);
    assert_eq!(photon_mesh.z_mids[..2], [-0.2, 1.4]);

    // z varies fastest
    let first = photon_mesh.voxels[0];
    assert_eq!(first.group, Some(Group::Value(1.0e36)));
    assert_eq!(first.coordinates(), [-9.0, -9.0, -0.2]);
    assert_eq!(first.result, 6.38182E-07);
    assert_eq!(first.error, 1.89457E-02);
    assert_eq!(photon_mesh.voxels[1].z, 1.4);
    assert_eq!(photon_mesh.voxels[1].result, 7.32943E-07);
}

#[rstest]
fn uniform_volume(photon_mesh: MeshGrid) {
    assert!((photon_mesh.voxel_volume() - 6.4).abs() < 1e-9);
    assert_eq!(photon_mesh.count_zeros(), 0);
    assert_eq!(photon_mesh.groups(), vec![Group::Value(1.0e36)]);
}

#[rstest]
fn time_layout_drops_total_and_zero(time_mesh: MeshGrid) {
    assert_eq!(time_mesh.layout, ColumnLayout::Time);
    assert_eq!(time_mesh.particle, "neutron");
    assert_eq!(time_mesh.t_bounds.len(), 5);
    assert_eq!(time_mesh.t_bounds[0], "-1.00E+36");

    assert_eq!(time_mesh.voxels.len(), 24);
    assert_eq!(
        time_mesh.groups(),
        vec![Group::Value(1.0e5), Group::Value(1.0e10), Group::Value(1.0e36)]
    );
    assert_eq!(time_mesh.count_zeros(), 0);
    assert_eq!(time_mesh.voxels[16].result, 3.0e-2);
}

#[rstest]
fn multiple_meshes() {
    let meshes = read_meshtal("./data/meshes.msht").unwrap();
    let ids: Vec<u32> = meshes.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![4, 14, 24]);

    // energy groups with a trailing total
    assert_eq!(meshes[0].voxels.len(), 12);
    assert_eq!(
        meshes[0].groups(),
        vec![Group::Value(1.0), Group::Value(20.0), Group::Total]
    );
    assert_eq!(meshes[0].e_bounds.len(), 3);

    // 5-column
    assert_eq!(meshes[1].layout, ColumnLayout::Position);
    assert_eq!(meshes[1].x_mids[0], -20.0);
    assert_eq!(meshes[1].voxels[1].result, 4.0);
    assert_eq!(meshes[1].voxels[1].group, None);
    assert!(meshes[1].groups().is_empty());
}

#[rstest]
#[case(4, 12, ColumnLayout::Energy)]
#[case(14, 2, ColumnLayout::Position)]
#[case(24, 12, ColumnLayout::Energy)]
fn target_mesh(#[case] id: u32, #[case] rows: usize, #[case] layout: ColumnLayout) {
    let mesh = read_meshtal_target("./data/meshes.msht", id).unwrap();
    assert_eq!(mesh.id, id);
    assert_eq!(mesh.voxels.len(), rows);
    assert_eq!(mesh.layout, layout);
}

#[rstest]
fn missing_target() {
    assert!(matches!(
        read_meshtal_target("./data/meshes.msht", 34),
        Err(Error::MeshNotFound(34))
    ));
}

#[rstest]
fn index_of_meshes() {
    let index = mesh_index("./data/meshes.msht").unwrap();
    assert_eq!(index.keys().copied().collect::<Vec<u32>>(), vec![4, 14, 24]);
    assert_eq!(index[&4], 5);
    assert_eq!(index[&14], 28);
    assert_eq!(next_mesh_start(&index, 4), Some(28));
    assert_eq!(next_mesh_start(&index, 24), None);
}

#[rstest]
fn unsupported_layout() {
    match read_meshtal("./data/cylinder.msht") {
        Err(Error::UnsupportedColumnLayout { id, header }) => {
            assert_eq!(id, 44);
            assert_eq!(header, "Energy R Z Th Result Rel Error");
        }
        other => panic!("Expected an unsupported layout, found {other:?}"),
    }
}

#[rstest]
fn short_data_row() {
    match read_meshtal("./data/malformed.msht") {
        Err(Error::MalformedRow { id, line, .. }) => {
            assert_eq!(id, 54);
            assert_eq!(line, 16);
        }
        other => panic!("Expected a malformed row, found {other:?}"),
    }
}

#[rstest]
fn missing_file() {
    assert!(matches!(
        read_meshtal("./data/not_a_file.msht"),
        Err(Error::IOError(_))
    ));
}
