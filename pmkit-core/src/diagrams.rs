//! Tutorial flow diagrams (SQL query lifecycle, authentication, microservices).
//!
//! Node coordinates, edges and flows are hand-authored tables. A flow is an
//! ordered list of edge ids that must form a connected path; tracing it yields
//! the highlighted edges and the waypoints a marker travels through.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct DiagramNode {
    pub id: &'static str,
    pub label: &'static str,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct DiagramEdge {
    pub id: &'static str,
    pub source: &'static str,
    pub target: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct DiagramFlow {
    pub name: &'static str,
    pub title: &'static str,
    pub edges: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Diagram {
    pub name: &'static str,
    pub title: &'static str,
    pub nodes: &'static [DiagramNode],
    pub edges: &'static [DiagramEdge],
    pub flows: &'static [DiagramFlow],
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Waypoint {
    pub node: &'static str,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlowTrace {
    pub diagram: &'static str,
    pub flow: &'static str,
    pub title: &'static str,
    pub edges: Vec<DiagramEdge>,
    pub waypoints: Vec<Waypoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagramError {
    #[error("unknown diagram '{0}'")]
    UnknownDiagram(String),

    #[error("diagram '{diagram}' has no flow named '{flow}'")]
    UnknownFlow { diagram: String, flow: String },

    #[error("flow '{flow}' references missing {kind} '{id}'")]
    Dangling {
        flow: String,
        kind: &'static str,
        id: String,
    },

    #[error("flow '{flow}' breaks at edge '{edge}'")]
    Disconnected { flow: String, edge: String },
}

const fn node(id: &'static str, label: &'static str, x: f64, y: f64) -> DiagramNode {
    DiagramNode { id, label, x, y }
}

const fn edge(
    id: &'static str,
    source: &'static str,
    target: &'static str,
    label: &'static str,
) -> DiagramEdge {
    DiagramEdge {
        id,
        source,
        target,
        label,
    }
}

const fn flow(
    name: &'static str,
    title: &'static str,
    edges: &'static [&'static str],
) -> DiagramFlow {
    DiagramFlow { name, title, edges }
}

pub const DIAGRAMS: &[Diagram] = &[
    Diagram {
        name: "sql",
        title: "How a SQL query is executed",
        nodes: &[
            node("client", "Client", 0.0, 150.0),
            node("parser", "Parser", 200.0, 150.0),
            node("planner", "Planner", 400.0, 150.0),
            node("optimizer", "Optimizer", 600.0, 150.0),
            node("index", "Index", 700.0, 300.0),
            node("executor", "Executor", 800.0, 150.0),
            node("buffer_pool", "Buffer Pool", 1000.0, 150.0),
            node("storage", "Disk Storage", 1000.0, 300.0),
        ],
        edges: &[
            edge("s1", "client", "parser", "SQL text"),
            edge("s2", "parser", "planner", "parse tree"),
            edge("s3", "planner", "optimizer", "logical plan"),
            edge("s4", "optimizer", "executor", "physical plan"),
            edge("s5", "executor", "buffer_pool", "page request"),
            edge("s6", "buffer_pool", "storage", "disk read"),
            edge("s7", "storage", "buffer_pool", "pages"),
            edge("s8", "buffer_pool", "executor", "cached pages"),
            edge("s9", "executor", "client", "result rows"),
            edge("s10", "optimizer", "index", "index statistics"),
            edge("s11", "index", "executor", "matching row ids"),
        ],
        flows: &[
            flow(
                "full-scan",
                "Full table scan",
                &["s1", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9"],
            ),
            flow(
                "cached-read",
                "Read served from the buffer pool",
                &["s1", "s2", "s3", "s4", "s5", "s8", "s9"],
            ),
            flow(
                "index-lookup",
                "Index lookup",
                &["s1", "s2", "s3", "s10", "s11", "s5", "s8", "s9"],
            ),
        ],
    },
    Diagram {
        name: "auth",
        title: "Token-based authentication",
        nodes: &[
            node("user", "User", 0.0, 150.0),
            node("browser", "Browser", 200.0, 150.0),
            node("auth_server", "Auth Server", 450.0, 50.0),
            node("token_store", "Token Store", 700.0, 0.0),
            node("api", "API Server", 450.0, 250.0),
            node("database", "Database", 700.0, 150.0),
        ],
        edges: &[
            edge("a1", "user", "browser", "enter credentials"),
            edge("a2", "browser", "auth_server", "POST /login"),
            edge("a3", "auth_server", "database", "verify password hash"),
            edge("a4", "database", "auth_server", "user record"),
            edge("a5", "auth_server", "token_store", "persist refresh token"),
            edge("a6", "token_store", "auth_server", "stored"),
            edge("a7", "auth_server", "browser", "access + refresh token"),
            edge("a8", "browser", "api", "Bearer access token"),
            edge("a9", "api", "auth_server", "introspect token"),
            edge("a10", "auth_server", "api", "claims"),
            edge("a11", "api", "database", "query"),
            edge("a12", "database", "api", "rows"),
            edge("a13", "api", "browser", "JSON response"),
            edge("a14", "browser", "auth_server", "refresh token"),
            edge("a15", "auth_server", "token_store", "rotate refresh token"),
        ],
        flows: &[
            flow(
                "login",
                "Password login",
                &["a1", "a2", "a3", "a4", "a5", "a6", "a7"],
            ),
            flow(
                "authorized-request",
                "Calling the API with an access token",
                &["a8", "a9", "a10", "a11", "a12", "a13"],
            ),
            flow(
                "token-refresh",
                "Refreshing an expired access token",
                &["a14", "a15", "a6", "a7"],
            ),
        ],
    },
    Diagram {
        name: "microservices",
        title: "Request path through microservices",
        nodes: &[
            node("client", "Client", 0.0, 200.0),
            node("gateway", "API Gateway", 200.0, 200.0),
            node("auth_service", "Auth Service", 200.0, 50.0),
            node("order_service", "Order Service", 450.0, 200.0),
            node("inventory_service", "Inventory Service", 450.0, 50.0),
            node("payment_service", "Payment Service", 700.0, 100.0),
            node("orders_db", "Orders DB", 700.0, 300.0),
            node("message_bus", "Message Bus", 450.0, 350.0),
            node("notification_service", "Notification Service", 700.0, 450.0),
        ],
        edges: &[
            edge("m1", "client", "gateway", "HTTPS request"),
            edge("m2", "gateway", "auth_service", "verify JWT"),
            edge("m3", "auth_service", "gateway", "identity"),
            edge("m4", "gateway", "order_service", "POST /orders"),
            edge("m5", "order_service", "inventory_service", "reserve stock"),
            edge("m6", "inventory_service", "order_service", "reserved"),
            edge("m7", "order_service", "payment_service", "charge"),
            edge("m8", "payment_service", "order_service", "payment confirmed"),
            edge("m9", "order_service", "orders_db", "insert order"),
            edge("m10", "orders_db", "order_service", "order id"),
            edge("m11", "order_service", "message_bus", "OrderPlaced event"),
            edge("m12", "message_bus", "notification_service", "deliver event"),
            edge("m13", "order_service", "gateway", "201 Created"),
            edge("m14", "gateway", "client", "response"),
            edge("m15", "gateway", "inventory_service", "GET /products"),
            edge("m16", "inventory_service", "gateway", "catalog"),
        ],
        flows: &[
            flow(
                "place-order",
                "Placing an order",
                &[
                    "m1", "m2", "m3", "m4", "m5", "m6", "m7", "m8", "m9", "m10", "m13", "m14",
                ],
            ),
            flow(
                "order-event",
                "Asynchronous order notification",
                &["m11", "m12"],
            ),
            flow(
                "browse-catalog",
                "Browsing the catalog",
                &["m1", "m15", "m16", "m14"],
            ),
        ],
    },
];

pub fn find_diagram(name: &str) -> Option<&'static Diagram> {
    DIAGRAMS.iter().find(|d| d.name == name)
}

pub fn trace_flow(diagram: &str, flow: &str) -> Result<FlowTrace, DiagramError> {
    find_diagram(diagram)
        .ok_or_else(|| DiagramError::UnknownDiagram(diagram.to_string()))?
        .trace(flow)
}

impl Diagram {
    pub fn node(&self, id: &str) -> Option<&'static DiagramNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&'static DiagramEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn flow(&self, name: &str) -> Option<&'static DiagramFlow> {
        self.flows.iter().find(|f| f.name == name)
    }

    pub fn trace(&self, name: &str) -> Result<FlowTrace, DiagramError> {
        let flow = self.flow(name).ok_or_else(|| DiagramError::UnknownFlow {
            diagram: self.name.to_string(),
            flow: name.to_string(),
        })?;

        let mut edges: Vec<DiagramEdge> = Vec::with_capacity(flow.edges.len());
        let mut waypoints = Vec::with_capacity(flow.edges.len() + 1);
        for edge_id in flow.edges {
            let edge = self.edge(edge_id).ok_or_else(|| DiagramError::Dangling {
                flow: flow.name.to_string(),
                kind: "edge",
                id: edge_id.to_string(),
            })?;

            match edges.last() {
                Some(previous) if previous.target != edge.source => {
                    return Err(DiagramError::Disconnected {
                        flow: flow.name.to_string(),
                        edge: edge.id.to_string(),
                    });
                }
                Some(_) => {}
                None => waypoints.push(self.waypoint(flow, edge.source)?),
            }
            waypoints.push(self.waypoint(flow, edge.target)?);
            edges.push(*edge);
        }

        Ok(FlowTrace {
            diagram: self.name,
            flow: flow.name,
            title: flow.title,
            edges,
            waypoints,
        })
    }

    fn waypoint(&self, flow: &DiagramFlow, node_id: &str) -> Result<Waypoint, DiagramError> {
        let node = self.node(node_id).ok_or_else(|| DiagramError::Dangling {
            flow: flow.name.to_string(),
            kind: "node",
            id: node_id.to_string(),
        })?;
        Ok(Waypoint {
            node: node.id,
            x: node.x,
            y: node.y,
        })
    }
}
