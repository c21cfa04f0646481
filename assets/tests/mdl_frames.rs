mod common;

use assets::{expand, AssetError, AssetLimits, LimitKind, Mdl, Palette};
use common::{FrameEntry, MdlFixture, SkinEntry};

#[test]
fn header_fields() {
    let bytes = MdlFixture::triangle().build();
    let mdl = Mdl::parse(&bytes).unwrap();
    let header = mdl.header();
    assert_eq!(header.magic, "IDPO");
    assert_eq!(header.version, 6);
    assert_eq!((header.skin_width, header.skin_height), (8, 4));
    assert_eq!(header.num_verts, 3);
    assert_eq!(header.num_tris, 1);
    assert_eq!(header.num_frames, 2);
    assert_eq!(header.eye_position.z, 22.0);
    assert_eq!(
        mdl.to_string(),
        "MDL: IDPO version 6 (1 skins, 1 triangles, 2 frames)"
    );
}

#[test]
fn blend_at_integer_index_is_exact() {
    let bytes = MdlFixture::triangle().build();
    let mdl = Mdl::parse(&bytes).unwrap();
    assert_eq!(mdl.blend_frames(0.0), mdl.frame_positions(0).unwrap());
    assert_eq!(mdl.blend_frames(1.0), mdl.frame_positions(1).unwrap());
}

#[test]
fn blend_midpoint_of_zero_and_ten_is_five() {
    let bytes = MdlFixture::triangle().build();
    let mdl = Mdl::parse(&bytes).unwrap();
    let blended = mdl.blend_frames(0.5);
    assert_eq!(blended.len(), 9);
    assert!(blended.iter().all(|&v| v == 5.0));
}

#[test]
fn blend_wraps_after_last_frame() {
    let bytes = MdlFixture::triangle().build();
    let mdl = Mdl::parse(&bytes).unwrap();
    // Halfway from frame 1 (tens) back to frame 0 (zeros).
    assert!(mdl.blend_frames(1.5).iter().all(|&v| v == 5.0));
    assert_eq!(mdl.blend_frames(2.0), mdl.blend_frames(0.0));
    assert_eq!(mdl.blend_frames(-1.0), mdl.blend_frames(1.0));
}

#[test]
fn positions_are_dequantized_in_reverse_winding() {
    let mut fixture = MdlFixture::triangle();
    fixture.scale = [2.0, 1.0, 0.5];
    fixture.origin = [1.0, -1.0, 0.0];
    fixture.frames = vec![FrameEntry::single(
        "pose",
        &[[1, 1, 1], [2, 2, 2], [3, 3, 3]],
    )];
    let bytes = fixture.build();
    let mdl = Mdl::parse(&bytes).unwrap();
    assert_eq!(
        mdl.frame_positions(0).unwrap(),
        &[7.0, 2.0, 1.5, 5.0, 1.0, 1.0, 3.0, 0.0, 0.5]
    );
    assert!(mdl.frame_positions(1).is_none());
}

#[test]
fn frame_vertices_keep_position_and_normal() {
    let mut fixture = MdlFixture::triangle();
    fixture.frames = vec![FrameEntry::single(
        "pose",
        &[[1, 2, 3], [4, 5, 6], [7, 8, 9]],
    )];
    let bytes = fixture.build();
    let mdl = Mdl::parse(&bytes).unwrap();
    let frame = &mdl.frames()[0];
    assert_eq!(frame.name, "pose");
    assert_eq!(frame.bbox_max.position, [255, 255, 255]);
    let decoded: Vec<_> = frame
        .vertices
        .iter()
        .map(|v| (v.position, v.normal_index))
        .collect();
    assert_eq!(decoded, vec![([1, 2, 3], 0), ([4, 5, 6], 1), ([7, 8, 9], 2)]);

    // One byte short of the last packed vertex.
    let err = Mdl::parse(&bytes[..bytes.len() - 1]).unwrap_err();
    assert!(matches!(err, AssetError::Schema(_)));
}

#[test]
fn uvs_flip_v_and_shift_back_facing_seam_vertices() {
    let mut fixture = MdlFixture::triangle();
    let bytes = fixture.build();
    let mdl = Mdl::parse(&bytes).unwrap();
    // Corners c, b, a: (8,4), (4,2) on seam, (0,0). Front facing, no shift.
    assert_eq!(mdl.uvs(), &[1.0, 0.0, 0.5, 0.5, 0.0, 1.0]);

    fixture.triangles = vec![(false, [0, 1, 2])];
    let bytes = fixture.build();
    let mdl = Mdl::parse(&bytes).unwrap();
    assert_eq!(mdl.uvs(), &[1.0, 0.0, 1.0, 0.5, 0.0, 1.0]);
}

#[test]
fn frame_groups_flatten_and_count() {
    let mut fixture = MdlFixture::triangle();
    let pose = |name: &str| (name.to_string(), vec![[0u8; 3]; 3]);
    fixture.frames = vec![
        FrameEntry::single("stand1", &[[0; 3]; 3]),
        FrameEntry::Group(vec![pose("run1"), pose("run2"), pose("run3")]),
        FrameEntry::single("pain1", &[[0; 3]; 3]),
        FrameEntry::Group(vec![pose("death1"), pose("death2")]),
    ];
    let bytes = fixture.build();
    let mdl = Mdl::parse(&bytes).unwrap();

    assert_eq!(mdl.header().num_frames, fixture.num_frames());
    assert_eq!(mdl.frames().len(), 7);
    assert_eq!(mdl.frame_groups().len(), 2);
    assert_eq!(mdl.ungrouped_frame_count(), 2);

    let grouped: usize = mdl.frame_groups().iter().map(|g| g.count).sum();
    assert_eq!(grouped + mdl.ungrouped_frame_count(), mdl.frames().len());
    assert_eq!(
        mdl.ungrouped_frame_count() + mdl.frame_groups().len(),
        mdl.header().num_frames
    );

    let run = &mdl.frame_groups()[0];
    assert_eq!((run.start, run.count), (1, 3));
    assert_eq!(run.times.len(), 3);
    assert_eq!(run.bbox_max.position, [255, 255, 255]);
    assert_eq!(mdl.frames()[4].name, "pain1");
}

#[test]
fn animations_follow_frame_names() {
    let mut fixture = MdlFixture::triangle();
    let frames = ["stand1", "stand2", "run1", "run2", "run3", "pain"];
    fixture.frames = frames
        .iter()
        .map(|name| FrameEntry::single(name, &[[0; 3]; 3]))
        .collect();
    let bytes = fixture.build();
    let mdl = Mdl::parse(&bytes).unwrap();

    let names: Vec<&str> = mdl.animations().iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["stand", "run", "pain"]);
    let run = mdl.find_animation("run").unwrap();
    assert_eq!((run.start, run.count), (2, 3));
    assert!(mdl.find_animation("walk").is_none());
}

#[test]
fn skin_groups_flatten() {
    let mut fixture = MdlFixture::triangle();
    fixture.skins = vec![SkinEntry::Single(1), SkinEntry::Group(3, 2)];
    let bytes = fixture.build();
    let mdl = Mdl::parse(&bytes).unwrap();

    assert_eq!(mdl.skins().len(), 4);
    assert_eq!(mdl.skin_groups().len(), 1);
    let group = &mdl.skin_groups()[0];
    assert_eq!((group.start, group.count), (1, 3));
    assert_eq!(group.times.len(), 3);

    let image = mdl.skin_image(2).unwrap();
    assert_eq!((image.width(), image.height()), (8, 4));
    assert!(image.pixels().iter().all(|&p| p == 2));
    let rgba = expand(&image, &Palette::greyscale(), None);
    assert_eq!(&rgba[..4], &[2, 2, 2, 255]);

    assert!(matches!(
        mdl.skin_image(4),
        Err(AssetError::InvalidReference { what: "skin", .. })
    ));
}

#[test]
fn triangle_vertex_out_of_range() {
    let mut fixture = MdlFixture::triangle();
    fixture.triangles = vec![(true, [0, 1, 3])];
    let bytes = fixture.build();
    assert_eq!(
        Mdl::parse(&bytes).unwrap_err(),
        AssetError::InvalidReference {
            what: "vertex",
            index: 3,
            count: 3
        }
    );
}

#[test]
fn unexpected_version_still_decodes() {
    let mut fixture = MdlFixture::triangle();
    fixture.version = 7;
    let bytes = fixture.build();
    assert_eq!(Mdl::parse(&bytes).unwrap().header().version, 7);
}

#[test]
fn truncated_frames_fail() {
    let mut bytes = MdlFixture::triangle().build();
    bytes.truncate(bytes.len() - 2);
    assert!(matches!(Mdl::parse(&bytes), Err(AssetError::Schema(_))));
}

#[test]
fn frame_limit() {
    let mut fixture = MdlFixture::triangle();
    fixture.frames = (0..70)
        .map(|i| FrameEntry::single(&format!("f{i}"), &[[0; 3]; 3]))
        .collect();
    let bytes = fixture.build();
    let err = Mdl::parse_with_limits(&bytes, &AssetLimits::for_testing()).unwrap_err();
    assert!(matches!(
        err,
        AssetError::LimitsExceeded {
            kind: LimitKind::Frames,
            limit: 64,
            actual: 70
        }
    ));
}

#[test]
fn decoding_is_idempotent() {
    let bytes = MdlFixture::triangle().build();
    assert_eq!(Mdl::parse(&bytes).unwrap(), Mdl::parse(&bytes).unwrap());
}
