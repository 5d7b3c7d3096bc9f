//! Shared fixture: a small but complete application project with one
//! native target, the standard named groups and the standard build phases.
#![allow(dead_code)]

use pbxproj::PbxProject;

pub const BASE_PROJECT: &str = r#"// !$*UTF8*$!
{
	archiveVersion = 1;
	classes = {
	};
	objectVersion = 46;
	objects = {

/* Begin PBXBuildFile section */
		1B0000000000000000000001 /* main.m in Sources */ = {isa = PBXBuildFile; fileRef = 1A0000000000000000000001 /* main.m */; };
/* End PBXBuildFile section */

/* Begin PBXCopyFilesBuildPhase section */
		1C0000000000000000000004 /* Embed Frameworks */ = {
			isa = PBXCopyFilesBuildPhase;
			buildActionMask = 2147483647;
			dstPath = "";
			dstSubfolderSpec = 10;
			files = (
			);
			name = "Embed Frameworks";
			runOnlyForDeploymentPostprocessing = 0;
		};
/* End PBXCopyFilesBuildPhase section */

/* Begin PBXFileReference section */
		1A0000000000000000000001 /* main.m */ = {isa = PBXFileReference; fileEncoding = 4; lastKnownFileType = sourcecode.c.objc; path = main.m; sourceTree = "<group>"; };
		1A0000000000000000000002 /* TestApp.app */ = {isa = PBXFileReference; explicitFileType = wrapper.application; includeInIndex = 0; path = TestApp.app; sourceTree = BUILT_PRODUCTS_DIR; };
/* End PBXFileReference section */

/* Begin PBXFrameworksBuildPhase section */
		1C0000000000000000000003 /* Frameworks */ = {
			isa = PBXFrameworksBuildPhase;
			buildActionMask = 2147483647;
			files = (
			);
			runOnlyForDeploymentPostprocessing = 0;
		};
/* End PBXFrameworksBuildPhase section */

/* Begin PBXGroup section */
		1D0000000000000000000001 = {
			isa = PBXGroup;
			children = (
				1A0000000000000000000001 /* main.m */,
				1D0000000000000000000002 /* Resources */,
				1D0000000000000000000003 /* Frameworks */,
				1D0000000000000000000004 /* Products */,
			);
			sourceTree = "<group>";
		};
		1D0000000000000000000002 /* Resources */ = {
			isa = PBXGroup;
			children = (
			);
			name = Resources;
			sourceTree = "<group>";
		};
		1D0000000000000000000003 /* Frameworks */ = {
			isa = PBXGroup;
			children = (
			);
			name = Frameworks;
			sourceTree = "<group>";
		};
		1D0000000000000000000004 /* Products */ = {
			isa = PBXGroup;
			children = (
				1A0000000000000000000002 /* TestApp.app */,
			);
			name = Products;
			sourceTree = "<group>";
		};
/* End PBXGroup section */

/* Begin PBXNativeTarget section */
		1E0000000000000000000001 /* TestApp */ = {
			isa = PBXNativeTarget;
			buildConfigurationList = 1F0000000000000000000002 /* Build configuration list for PBXNativeTarget "TestApp" */;
			buildPhases = (
				1C0000000000000000000001 /* Sources */,
				1C0000000000000000000002 /* Resources */,
				1C0000000000000000000003 /* Frameworks */,
				1C0000000000000000000004 /* Embed Frameworks */,
			);
			buildRules = (
			);
			dependencies = (
			);
			name = TestApp;
			productName = TestApp;
			productReference = 1A0000000000000000000002 /* TestApp.app */;
			productType = "com.apple.product-type.application";
		};
/* End PBXNativeTarget section */

/* Begin PBXProject section */
		2A0000000000000000000001 /* Project object */ = {
			isa = PBXProject;
			attributes = {
				LastUpgradeCheck = 0830;
			};
			buildConfigurationList = 1F0000000000000000000001 /* Build configuration list for PBXProject "TestApp" */;
			compatibilityVersion = "Xcode 3.2";
			developmentRegion = English;
			hasScannedForEncodings = 0;
			knownRegions = (
				en,
			);
			mainGroup = 1D0000000000000000000001;
			productRefGroup = 1D0000000000000000000004 /* Products */;
			projectDirPath = "";
			projectRoot = "";
			targets = (
				1E0000000000000000000001 /* TestApp */,
			);
		};
/* End PBXProject section */

/* Begin PBXResourcesBuildPhase section */
		1C0000000000000000000002 /* Resources */ = {
			isa = PBXResourcesBuildPhase;
			buildActionMask = 2147483647;
			files = (
			);
			runOnlyForDeploymentPostprocessing = 0;
		};
/* End PBXResourcesBuildPhase section */

/* Begin PBXSourcesBuildPhase section */
		1C0000000000000000000001 /* Sources */ = {
			isa = PBXSourcesBuildPhase;
			buildActionMask = 2147483647;
			files = (
				1B0000000000000000000001 /* main.m in Sources */,
			);
			runOnlyForDeploymentPostprocessing = 0;
		};
/* End PBXSourcesBuildPhase section */

/* Begin XCBuildConfiguration section */
		2B0000000000000000000001 /* Debug */ = {
			isa = XCBuildConfiguration;
			buildSettings = {
			};
			name = Debug;
		};
		2B0000000000000000000002 /* Release */ = {
			isa = XCBuildConfiguration;
			buildSettings = {
			};
			name = Release;
		};
		2B0000000000000000000003 /* Debug */ = {
			isa = XCBuildConfiguration;
			buildSettings = {
				FRAMEWORK_SEARCH_PATHS = "$(inherited)";
				PRODUCT_NAME = TestApp;
			};
			name = Debug;
		};
		2B0000000000000000000004 /* Release */ = {
			isa = XCBuildConfiguration;
			buildSettings = {
				PRODUCT_NAME = TestApp;
			};
			name = Release;
		};
/* End XCBuildConfiguration section */

/* Begin XCConfigurationList section */
		1F0000000000000000000001 /* Build configuration list for PBXProject "TestApp" */ = {
			isa = XCConfigurationList;
			buildConfigurations = (
				2B0000000000000000000001 /* Debug */,
				2B0000000000000000000002 /* Release */,
			);
			defaultConfigurationIsVisible = 0;
			defaultConfigurationName = Release;
		};
		1F0000000000000000000002 /* Build configuration list for PBXNativeTarget "TestApp" */ = {
			isa = XCConfigurationList;
			buildConfigurations = (
				2B0000000000000000000003 /* Debug */,
				2B0000000000000000000004 /* Release */,
			);
			defaultConfigurationIsVisible = 0;
			defaultConfigurationName = Release;
		};
/* End XCConfigurationList section */
	};
	rootObject = 2A0000000000000000000001 /* Project object */;
}
"#;

/// UUID of the fixture's only native target.
pub const TARGET_UUID: &str = "1E0000000000000000000001";

pub fn base_project() -> PbxProject {
    PbxProject::from_source(BASE_PROJECT).expect("fixture must parse")
}
