//! Composition tests against the local engine

use drydock_core::config::DEFAULT_VPC_ID;
use drydock_core::{DeployConfig, HealthCheck, IngressRule, NetworkBinding};
use drydock_engine::compose::datastore::{DatabaseProperties, SecurityGroupProperties};
use drydock_engine::compose::network::VpcLookupProperties;
use drydock_engine::compose::service::{AutoscaleProperties, ServiceProperties};
use drydock_engine::{
    DependencyGraph, LocalEngine, ProvisionEngine, ProvisionError, ResourceKind, compose,
};

fn prod_config() -> DeployConfig {
    DeployConfig {
        environment: "prod".to_string(),
        stack_name: "prod-app-infra".to_string(),
        ..DeployConfig::default()
    }
}

#[tokio::test]
async fn test_compose_emits_five_stacks_in_dependency_order() {
    let cfg = DeployConfig::default();
    let engine = LocalEngine::new();
    let deployment = compose(&cfg, &engine).await.unwrap();

    assert_eq!(deployment.manifest.stacks.len(), 5);
    assert_eq!(deployment.manifest.resource_count(), 13);

    let graph = DependencyGraph::from_stacks(&deployment.manifest.stacks).unwrap();
    assert_eq!(graph.len(), 5);
    let order = graph.topo_order().unwrap();
    let pos = |name: &str| order.iter().position(|n| n == name).unwrap();

    let network = cfg.network_stack_name();
    let cluster = cfg.cluster_stack_name();
    assert!(pos(&network) < pos(&cluster));
    assert!(pos(&cluster) < pos(&cfg.service_stack_name("ui")));
    assert!(pos(&cluster) < pos(&cfg.service_stack_name("api")));
    assert!(pos(&network) < pos(&cfg.datastore_stack_name()));

    assert!(graph.depends_transitively(&cfg.service_stack_name("api"), &network));
    assert!(graph.depends_transitively(&cfg.datastore_stack_name(), &network));

    // Stacks were declared to the engine in exactly the verified order.
    let declared: Vec<String> = deployment.handles.iter().map(|h| h.stack.clone()).collect();
    assert_eq!(declared, order);
    let recorded: Vec<String> = engine
        .recorded()
        .await
        .iter()
        .map(|s| s.name.clone())
        .collect();
    assert_eq!(recorded, order);
}

#[tokio::test]
async fn test_prod_suffix_drives_all_stack_names() {
    let cfg = prod_config();
    let deployment = compose(&cfg, &LocalEngine::new()).await.unwrap();

    let names: Vec<&str> = deployment
        .manifest
        .stacks
        .iter()
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(
        names,
        vec![
            "prod-app-infra-vpc",
            "prod-app-infra-ecs-cluster",
            "prod-app-infra-service-ui",
            "prod-app-infra-service-api",
            "prod-app-infra-db",
        ]
    );

    for stack in &deployment.manifest.stacks {
        assert_eq!(stack.tags.environment, "prod");
        assert_eq!(stack.tags.app, "TEST_APPLICATION_TAG");
    }

    // Service names derive from the suffix too.
    let ui_stack = deployment.manifest.stack("prod-app-infra-service-ui").unwrap();
    let props: ServiceProperties = ui_stack.resource("service").unwrap().properties_as().unwrap();
    assert_eq!(props.spec.name, "prod-app-ui");

    // The same configuration always composes the same manifest.
    let again = compose(&cfg, &LocalEngine::new()).await.unwrap();
    assert_eq!(again.manifest, deployment.manifest);
}

#[tokio::test]
async fn test_lookup_binding_is_recorded() {
    let cfg = DeployConfig::default();
    let deployment = compose(&cfg, &LocalEngine::new()).await.unwrap();

    assert_eq!(
        deployment.network.binding,
        NetworkBinding::Existing {
            vpc_id: DEFAULT_VPC_ID.to_string()
        }
    );

    let network_stack = deployment.manifest.stack(&cfg.network_stack_name()).unwrap();
    let lookup = network_stack.resource("vpc-lookup").unwrap();
    assert_eq!(lookup.kind, ResourceKind::VpcLookup);
    let props: VpcLookupProperties = lookup.properties_as().unwrap();
    assert_eq!(props.vpc_id, DEFAULT_VPC_ID);
}

#[tokio::test]
async fn test_empty_vpc_id_declares_network() {
    let cfg = DeployConfig {
        vpc_id: String::new(),
        ..DeployConfig::default()
    };
    let deployment = compose(&cfg, &LocalEngine::new()).await.unwrap();

    assert_eq!(
        deployment.network.binding,
        NetworkBinding::Declared {
            logical_id: "vpc".to_string()
        }
    );

    let network_stack = deployment.manifest.stack(&cfg.network_stack_name()).unwrap();
    let vpc = network_stack.resource("vpc").unwrap();
    assert_eq!(vpc.kind, ResourceKind::Vpc);
    let spec: drydock_core::VpcSpec = vpc.properties_as().unwrap();
    assert_eq!(spec.name, "app-vpc");
    assert_eq!(spec.cidr, "10.0.0.0/16");
    assert_eq!(spec.max_azs, 2);
}

#[tokio::test]
async fn test_unknown_network_aborts_composition() {
    let cfg = DeployConfig::default();
    let engine = LocalEngine::new().with_known_networks(["vpc-something-else"]);

    let err = compose(&cfg, &engine).await.unwrap_err();
    assert!(matches!(err, ProvisionError::NetworkNotFound(id) if id == DEFAULT_VPC_ID));
    assert!(engine.recorded().await.is_empty());
}

#[tokio::test]
async fn test_health_checks_round_trip_through_declarations() {
    let cfg = DeployConfig::default();
    let deployment = compose(&cfg, &LocalEngine::new()).await.unwrap();

    let ui_stack = deployment.manifest.stack(&cfg.service_stack_name("ui")).unwrap();
    let ui: ServiceProperties = ui_stack.resource("service").unwrap().properties_as().unwrap();
    assert_eq!(ui.spec.health_check, HealthCheck::at_path("/"));
    assert_eq!(ui.spec.container_port, 80);

    let api_stack = deployment.manifest.stack(&cfg.service_stack_name("api")).unwrap();
    let api: ServiceProperties = api_stack.resource("service").unwrap().properties_as().unwrap();
    assert_eq!(api.spec.health_check, HealthCheck::at_path("/hello"));
    assert_eq!(api.spec.health_check.timeout_secs, 100);
    assert_eq!(api.spec.health_check.interval_secs, 120);
    assert_eq!(api.spec.health_check.healthy_http_codes, "200-299");
    assert_eq!(api.spec.container_port, 8080);
    assert_eq!(api.spec.env["SPRING_PROFILES_ACTIVE"], "dev");
    assert_eq!(api.cluster.name, cfg.cluster_stack_name());
    assert_eq!(api.access_logs_bucket, "access-logs");
}

#[tokio::test]
async fn test_autoscale_bounds_in_declarations() {
    let capped = DeployConfig {
        desired_count: 2,
        autoscale_max: Some(5),
        ..DeployConfig::default()
    };
    let deployment = compose(&capped, &LocalEngine::new()).await.unwrap();
    let stack = deployment.manifest.stack(&capped.service_stack_name("api")).unwrap();
    let props: AutoscaleProperties =
        stack.resource("autoscaling").unwrap().properties_as().unwrap();
    assert_eq!(props.service, "service");
    assert_eq!(props.policy.min_capacity, 2);
    assert_eq!(props.policy.max_capacity, 5);
    assert_eq!(props.policy.target_cpu_percent, 80);

    let uncapped = DeployConfig {
        desired_count: 2,
        autoscale_max: None,
        ..DeployConfig::default()
    };
    let deployment = compose(&uncapped, &LocalEngine::new()).await.unwrap();
    let stack = deployment.manifest.stack(&uncapped.service_stack_name("ui")).unwrap();
    let props: AutoscaleProperties =
        stack.resource("autoscaling").unwrap().properties_as().unwrap();
    assert_eq!(props.policy.min_capacity, 2);
    assert_eq!(props.policy.max_capacity, 2);
}

#[tokio::test]
async fn test_ingress_rules_exact_under_each_policy() {
    let open = DeployConfig {
        db_public_ingress: true,
        ..DeployConfig::default()
    };
    let deployment = compose(&open, &LocalEngine::new()).await.unwrap();
    let stack = deployment.manifest.stack(&open.datastore_stack_name()).unwrap();
    let group: SecurityGroupProperties = stack
        .resource("db-security-group")
        .unwrap()
        .properties_as()
        .unwrap();
    assert_eq!(
        group.ingress,
        vec![
            IngressRule::FromSelf {
                description: "all from self".to_string()
            },
            IngressRule::Cidr {
                cidr: "0.0.0.0/0".to_string(),
                from_port: 3306,
                to_port: 3306,
                description: "tcp3306".to_string(),
            },
        ]
    );

    let closed = DeployConfig::default();
    let deployment = compose(&closed, &LocalEngine::new()).await.unwrap();
    let stack = deployment.manifest.stack(&closed.datastore_stack_name()).unwrap();
    let group: SecurityGroupProperties = stack
        .resource("db-security-group")
        .unwrap()
        .properties_as()
        .unwrap();
    assert_eq!(
        group.ingress,
        vec![IngressRule::FromSelf {
            description: "all from self".to_string()
        }]
    );
    assert_eq!(group.egress.len(), 1);
    assert_eq!(group.egress[0].cidr, "0.0.0.0/0");
}

#[tokio::test]
async fn test_database_wiring_references_satellites() {
    let cfg = DeployConfig::default();
    let deployment = compose(&cfg, &LocalEngine::new()).await.unwrap();

    let stack = deployment.manifest.stack(&cfg.datastore_stack_name()).unwrap();
    let database = stack.resource("database").unwrap();
    assert_eq!(
        database.depends_on,
        vec!["db-credentials".to_string(), "db-security-group".to_string()]
    );

    let props: DatabaseProperties = database.properties_as().unwrap();
    assert_eq!(props.db_name, "dev-app-db");
    assert_eq!(props.security_group, "db-security-group");
    assert_eq!(props.credentials_secret, "db-credentials");
    assert_eq!(props.instance.engine_version, "8.0.28");
    assert!(!props.instance.publicly_accessible);

    let secret = stack.resource("db-credentials").unwrap();
    let creds: drydock_core::CredentialSpec = secret.properties_as().unwrap();
    assert_eq!(creds.secret_name, "dev-app-infra-dev-app-db-credentials");
    assert_eq!(creds.username, "admin");
}

#[tokio::test]
async fn test_out_of_order_submission_rejected() {
    let cfg = DeployConfig::default();
    let deployment = compose(&cfg, &LocalEngine::new()).await.unwrap();

    // Replay the cluster stack onto a fresh engine before its network.
    let fresh = LocalEngine::new();
    let cluster_stack = deployment.manifest.stack(&cfg.cluster_stack_name()).unwrap();
    let err = fresh.declare(cluster_stack).await.unwrap_err();
    assert!(matches!(
        err,
        ProvisionError::MissingDependency { dependency, .. }
            if dependency == cfg.network_stack_name()
    ));
}
