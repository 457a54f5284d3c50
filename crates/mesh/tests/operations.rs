//! Integration tests for queries and arithmetic on parsed meshes

use mctools_mesh::{
    read_meshtal, read_meshtal_target, DerivedColumn, Error, Group, MeshGrid, Plane,
};
use rstest::{fixture, rstest};

#[fixture]
fn meshes() -> Vec<MeshGrid> {
    read_meshtal("./data/meshes.msht").unwrap()
}

#[rstest]
fn point_in_every_group(meshes: Vec<MeshGrid>) {
    let mesh = &meshes[0];
    assert_eq!(mesh.point(8.0, 1.0, 0.0, None).unwrap(), vec![3.0, 7.0, 10.0]);
    assert_eq!(
        mesh.point(8.0, 1.0, 0.0, Some(Group::Total)).unwrap(),
        vec![10.0]
    );
    assert_eq!(mesh.point(8.0, 1.0, 0.0, Some(20.0.into())).unwrap(), vec![7.0]);
    assert!(mesh.point(8.0, 1.0, 0.0, Some(5.0.into())).unwrap().is_empty());
}

#[rstest]
fn group_filter_needs_group_column(meshes: Vec<MeshGrid>) {
    let mesh = &meshes[1];
    assert_eq!(mesh.point(-25.0, 0.0, 0.0, None).unwrap(), vec![2.0]);
    assert!(matches!(
        mesh.point(-25.0, 0.0, 0.0, Some(Group::Total)),
        Err(Error::NoGroupColumn(14))
    ));
}

#[rstest]
fn line_along_x(meshes: Vec<MeshGrid>) {
    let mesh = &meshes[0];
    let results = mesh
        .line([0.0, 8.0, 5.0], [10.0, 8.0, 5.0], Some(Group::Value(1.0)))
        .unwrap();
    assert_eq!(results, vec![2.0, 4.0]);
}

#[rstest]
fn slice_defaults_to_last_group(meshes: Vec<MeshGrid>) {
    let slice = meshes[0].slice(Plane::XY, 5.0, None).unwrap();
    assert_eq!(slice.fixed, 5.0);
    assert_eq!(slice.i_mids, vec![2.5, 7.5]);

    // total group, rows follow y
    assert_eq!(slice.values[[0, 0]], 6.0);
    assert_eq!(slice.values[[1, 0]], 8.0);
    assert_eq!(slice.values[[0, 1]], 10.0);
    assert_eq!(slice.errors[[1, 1]], 0.5);
}

#[rstest]
fn dense_arrays(meshes: Vec<MeshGrid>) {
    let (values, errors) = meshes[0].to_3d(Some(Group::Value(20.0))).unwrap();
    assert_eq!(values.shape(), &[2, 2, 1]);
    assert_eq!(values[[1, 0, 0]], 7.0);
    assert_eq!(errors[[1, 0, 0]], 0.4);
}

#[rstest]
fn combine_compatible(meshes: Vec<MeshGrid>) {
    let combined = (&meshes[0] + &meshes[2]).unwrap();
    assert_eq!(combined.id, 4);
    assert_eq!(combined.voxels.len(), 12);
    assert_eq!(combined.x_mids, meshes[0].x_mids);

    // 1 + 2, and 0.3 with 0.3 in quadrature
    let first = combined.voxels[0];
    assert_eq!(first.result, 3.0);
    assert!((first.error - 0.18f64.sqrt()).abs() < 1e-12);
    assert_eq!(first.group, Some(Group::Value(1.0)));
}

#[rstest]
fn combine_with_itself() {
    let mesh = read_meshtal_target("./data/fmesh_214.msht", 214).unwrap();
    let combined = (&mesh + &mesh).unwrap();
    assert_eq!(combined.voxels.len(), mesh.voxels.len());

    // values double and errors grow by sqrt(2)
    for (sum, voxel) in combined.voxels.iter().zip(mesh.voxels.iter()) {
        assert_eq!(sum.result, 2.0 * voxel.result);
        assert!((sum.error - voxel.error * 2f64.sqrt()).abs() < 1e-12);
        assert_eq!(sum.coordinates(), voxel.coordinates());
        assert_eq!(sum.group, voxel.group);
    }
}

#[rstest]
#[case("./data/meshes.msht", 4, "energy")] // case 1
#[case("./data/fmesh_314.msht", 314, "time")] // case 2
fn combine_group_bounds(#[case] path: &str, #[case] id: u32, #[case] expected: &str) {
    let mesh = read_meshtal_target(path, id).unwrap();
    let mut other = mesh.clone();
    other.e_bounds.push("1.00E+02".to_string());
    other.t_bounds.push("1.00E+40".to_string());

    match mesh.combine(&other) {
        Err(Error::BoundsMismatch { dimension }) => assert_eq!(dimension, expected),
        result => panic!("Expected a bounds mismatch, found {result:?}"),
    }
}

#[rstest]
fn combine_incompatible(meshes: Vec<MeshGrid>) {
    assert!(matches!(
        meshes[0].combine(&meshes[1]),
        Err(Error::BoundsMismatch { dimension }) if dimension == "x"
    ));
}

#[rstest]
fn derived_columns(mut meshes: Vec<MeshGrid>) {
    let mesh = &mut meshes[1];
    mesh.add_derived(DerivedColumn::Upper);
    mesh.add_derived(DerivedColumn::Lower);

    let close = |a: &[f64], b: &[f64]| a.iter().zip(b).all(|(a, b)| (a - b).abs() < 1e-12);
    assert!(close(&mesh.derived[&DerivedColumn::Upper], &[2.1, 4.2]));
    assert!(close(&mesh.derived[&DerivedColumn::Lower], &[1.9, 3.8]));

    // derived values are not carried through arithmetic
    let combined = mesh.combine(mesh).unwrap();
    assert!(combined.derived.is_empty());
}

#[rstest]
#[case("xy", Plane::XY)] // case 1
#[case("Xz", Plane::XZ)] // case 2
#[case(" YZ ", Plane::YZ)] // case 3
fn plane_names(#[case] name: &str, #[case] plane: Plane) {
    assert_eq!(name.parse::<Plane>().unwrap(), plane);
}

#[rstest]
fn unknown_plane() {
    match "AB".parse::<Plane>() {
        Err(Error::UnknownPlane(name)) => assert_eq!(name, "AB"),
        result => panic!("Expected an unknown plane, found {result:?}"),
    }
}

#[rstest]
fn non_uniform_volume() {
    let mesh = read_meshtal_target("./data/nonuniform.msht", 64).unwrap();
    assert_eq!(mesh.x_mids, vec![0.5, 2.0]);
    assert_eq!(mesh.number_voxels(), 2);

    // bounding box of 3 x 2 x 1 shared between two voxels
    assert_eq!(mesh.voxel_volume(), 3.0);
    assert_eq!(mesh.point(2.9, 1.0, 0.5, None).unwrap(), vec![2.0]);
}
