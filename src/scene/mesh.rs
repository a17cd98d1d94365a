//! Mesh records as the host stores them: vertices, edges and polygons

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A single mesh vertex in object (local) space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeshVertex {
    pub co: Vec3,
}

/// An edge between two vertex indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshEdge {
    pub vertices: [u32; 2],
}

/// A face bounded by three or more vertex indices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshPolygon {
    pub vertices: Vec<u32>,
}

/// Vertex, edge and polygon records of one mesh.
///
/// Indices are stored as given; nothing here checks that they are in range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub edges: Vec<MeshEdge>,
    pub polygons: Vec<MeshPolygon>,
}

impl MeshData {
    /// Creates an empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a vertex and returns its index
    pub fn add_vertex(&mut self, co: Vec3) -> u32 {
        self.vertices.push(MeshVertex { co });
        (self.vertices.len() - 1) as u32
    }

    /// Appends an edge between two vertex indices
    pub fn add_edge(&mut self, a: u32, b: u32) -> &mut Self {
        self.edges.push(MeshEdge { vertices: [a, b] });
        self
    }

    /// Appends a polygon
    pub fn add_polygon(&mut self, vertices: &[u32]) -> &mut Self {
        self.polygons.push(MeshPolygon { vertices: vertices.to_vec() });
        self
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    /// Default cube: 8 vertices at ±1, 12 edges, 6 quads
    pub fn unit_cube() -> Self {
        let mut mesh = Self::new();
        for co in [
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
        ] {
            mesh.add_vertex(co);
        }

        for [a, b] in [
            [0, 1], [1, 2], [2, 3], [3, 0],
            [4, 5], [5, 6], [6, 7], [7, 4],
            [0, 4], [1, 5], [2, 6], [3, 7],
        ] {
            mesh.add_edge(a, b);
        }

        mesh.add_polygon(&[0, 3, 2, 1])
            .add_polygon(&[4, 5, 6, 7])
            .add_polygon(&[0, 1, 5, 4])
            .add_polygon(&[1, 2, 6, 5])
            .add_polygon(&[2, 3, 7, 6])
            .add_polygon(&[3, 0, 4, 7]);
        mesh
    }

    /// Fan-triangulates every polygon with more than three corners.
    ///
    /// Each fan adds the diagonals from the first corner as new edges.
    pub fn triangulate(&mut self) {
        let mut polygons = Vec::with_capacity(self.polygons.len());
        for polygon in self.polygons.drain(..) {
            let corners = &polygon.vertices;
            if corners.len() <= 3 {
                polygons.push(polygon);
                continue;
            }
            let first = corners[0];
            for i in 1..corners.len() - 1 {
                polygons.push(MeshPolygon { vertices: vec![first, corners[i], corners[i + 1]] });
                if i > 1 {
                    self.edges.push(MeshEdge { vertices: [first, corners[i]] });
                }
            }
        }
        self.polygons = polygons;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_cube_counts() {
        let cube = MeshData::unit_cube();
        assert_eq!(cube.vertex_count(), 8);
        assert_eq!(cube.edge_count(), 12);
        assert_eq!(cube.polygon_count(), 6);
        assert!(cube.polygons.iter().all(|p| p.vertices.len() == 4));
    }

    #[test]
    fn test_triangulate_quads() {
        let mut cube = MeshData::unit_cube();
        cube.triangulate();
        assert_eq!(cube.polygon_count(), 12);
        assert_eq!(cube.edge_count(), 18);
        assert!(cube.polygons.iter().all(|p| p.vertices.len() == 3));
        assert_eq!(cube.polygons[0].vertices, vec![0, 3, 2]);
        assert_eq!(cube.polygons[1].vertices, vec![0, 2, 1]);
    }

    #[test]
    fn test_triangulate_keeps_triangles() {
        let mut mesh = MeshData::new();
        mesh.add_vertex(Vec3::ZERO);
        mesh.add_vertex(Vec3::X);
        mesh.add_vertex(Vec3::Y);
        mesh.add_edge(0, 1).add_edge(1, 2).add_edge(2, 0);
        mesh.add_polygon(&[0, 1, 2]);

        let before = mesh.clone();
        mesh.triangulate();
        assert_eq!(mesh, before);
    }
}
